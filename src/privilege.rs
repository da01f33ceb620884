use nix::unistd::geteuid;

pub trait PrivilegeCheck {
    fn has_elevated_privileges(&self) -> bool;
}

/// Checks the effective uid of the current process against root.
pub struct EffectiveUser;

impl PrivilegeCheck for EffectiveUser {
    fn has_elevated_privileges(&self) -> bool {
        geteuid().is_root()
    }
}
