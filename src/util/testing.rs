use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use crate::error::Result;
use crate::privilege::PrivilegeCheck;
use crate::util::command::{CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
pub struct Call {
    pub key: String,
    pub args: Vec<String>,
    pub envs: HashMap<String, String>,
    pub cwd: PathBuf,
}

/// Stand-in for mount, umount, lsblk and the archiver. Mount state is
/// simulated so `lsblk` answers the way the real tool would.
pub struct RecordingRunner {
    calls: RefCell<Vec<Call>>,
    mounted_at: RefCell<Option<PathBuf>>,
    codes: HashMap<String, i32>,
    listing: String,
    mount_binds: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            mounted_at: RefCell::new(None),
            codes: HashMap::new(),
            listing: String::new(),
            mount_binds: true,
        }
    }

    pub fn with_code(mut self, key: &str, code: i32) -> Self {
        self.codes.insert(key.to_string(), code);
        self
    }

    pub fn with_listing(mut self, listing: &str) -> Self {
        self.listing = listing.to_string();
        self
    }

    /// `mount` exits zero but the device never shows up at the directory.
    pub fn without_mount_binding(mut self) -> Self {
        self.mount_binds = false;
        self
    }

    pub fn already_mounted(self, dir: &Path) -> Self {
        *self.mounted_at.borrow_mut() = Some(dir.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded keys without the mountpoint queries.
    pub fn actions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.key != "lsblk")
            .map(|c| c.key.clone())
            .collect()
    }

    pub fn find(&self, key: &str) -> Option<Call> {
        self.calls.borrow().iter().find(|c| c.key == key).cloned()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted_at.borrow().is_some()
    }

    fn record(&self, cmd: &Command) -> (String, Vec<String>) {
        let program = Path::new(cmd.get_program())
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        let key = match program.as_str() {
            "mount" | "umount" | "lsblk" => program,
            _ => args.first().cloned().unwrap_or(program),
        };
        let envs = cmd
            .get_envs()
            .filter_map(|(k, v)| v.map(|v| (os(k), os(v))))
            .collect();
        let cwd = cmd
            .get_current_dir()
            .map(Path::to_path_buf)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_default();
        self.calls.borrow_mut().push(Call {
            key: key.clone(),
            args: args.clone(),
            envs,
            cwd,
        });
        (key, args)
    }

    fn code(&self, key: &str) -> i32 {
        self.codes.get(key).copied().unwrap_or(0)
    }

    fn simulate(&self, cmd: &Command) -> CommandOutput {
        let (key, args) = self.record(cmd);
        let code = self.code(&key);
        let mut stdout = String::new();
        match key.as_str() {
            "mount" => {
                if code == 0 && self.mount_binds {
                    *self.mounted_at.borrow_mut() = args.last().map(PathBuf::from);
                }
            }
            "umount" => {
                if code == 0 {
                    *self.mounted_at.borrow_mut() = None;
                }
            }
            "lsblk" => {
                if let Some(dir) = self.mounted_at.borrow().as_ref() {
                    stdout = format!("{}\n", dir.display());
                } else {
                    stdout = "\n".to_string();
                }
            }
            "list" => stdout = self.listing.clone(),
            _ => {}
        }
        CommandOutput {
            code,
            stdout,
            stderr: String::new(),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn status(&self, cmd: &mut Command) -> Result<i32> {
        Ok(self.simulate(cmd).code)
    }

    fn output(&self, cmd: &mut Command) -> Result<CommandOutput> {
        Ok(self.simulate(cmd))
    }
}

pub struct FixedPrivilege(pub bool);

impl PrivilegeCheck for FixedPrivilege {
    fn has_elevated_privileges(&self) -> bool {
        self.0
    }
}

/// Writes an executable placeholder so PATH lookups of the archiver succeed.
pub fn fake_archiver(dir: &Path) -> PathBuf {
    scripted_archiver(dir, "exit 0")
}

/// Executable `borg` in `dir` that runs `body` under `/bin/sh`.
pub fn scripted_archiver(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("borg");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write fake archiver");
    let mut perms = fs::metadata(&path).expect("stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    path
}

/// In-memory progress sink that stays readable after being boxed.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn os(value: &OsStr) -> String {
    value.to_string_lossy().to_string()
}
