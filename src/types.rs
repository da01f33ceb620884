use std::fmt;
use std::str::FromStr;

/// Name of one archive inside the repository, as printed by the archiver's
/// listing. Conventionally `{hostname}-{timestamp}` but treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveName(String);

impl ArchiveName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ArchiveName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("archive name is empty".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("archive name {:?} contains whitespace", s));
        }
        Ok(ArchiveName(s.to_string()))
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository passphrase. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(value: impl Into<String>) -> Self {
        Passphrase(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

impl fmt::Display for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    pub restore: bool,
    pub quiet: bool,
    pub debug: bool,
}

/// Terminal outcome of one run. Each variant is one process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    Ok,
    NoPrivileges,
    MountFailed,
    UnmountFailed,
    EnvironmentFailed,
    ConsistencyFailed,
    BackupFailed,
    PruneFailed,
    RestoreFailed,
}

impl RunResult {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunResult::Ok => 0,
            RunResult::NoPrivileges => 1,
            RunResult::MountFailed => 2,
            RunResult::UnmountFailed => 3,
            RunResult::EnvironmentFailed => 4,
            RunResult::ConsistencyFailed => 5,
            RunResult::BackupFailed => 6,
            RunResult::PruneFailed => 7,
            RunResult::RestoreFailed => 8,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RunResult::Ok)
    }
}
