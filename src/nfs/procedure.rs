use std::fmt;

/// NFSv3 operations in the order their counters follow the leading field of the `proc3` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nfs3Procedure {
    Getattr,
    Setattr,
    Lookup,
    Access,
    Readlink,
    Read,
    Write,
    Create,
    Mkdir,
    Symlink,
    Mknod,
    Remove,
    Rmdir,
    Rename,
    Link,
    Readdir,
    Readdirplus,
    Fsstat,
    Fsinfo,
    Pathconf,
    Commit,
}

impl Nfs3Procedure {
    /// Every operation, in record order. `ALL[i]` is read from position `i + 1`.
    pub const ALL: [Nfs3Procedure; 21] = [
        Self::Getattr,
        Self::Setattr,
        Self::Lookup,
        Self::Access,
        Self::Readlink,
        Self::Read,
        Self::Write,
        Self::Create,
        Self::Mkdir,
        Self::Symlink,
        Self::Mknod,
        Self::Remove,
        Self::Rmdir,
        Self::Rename,
        Self::Link,
        Self::Readdir,
        Self::Readdirplus,
        Self::Fsstat,
        Self::Fsinfo,
        Self::Pathconf,
        Self::Commit,
    ];

    /// Position of this operation's counter in the `proc3` record.
    pub fn position(self) -> usize {
        self as usize + 1
    }

    /// Lowercase name used in metric names, e.g. `readdirplus`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Getattr => "getattr",
            Self::Setattr => "setattr",
            Self::Lookup => "lookup",
            Self::Access => "access",
            Self::Readlink => "readlink",
            Self::Read => "read",
            Self::Write => "write",
            Self::Create => "create",
            Self::Mkdir => "mkdir",
            Self::Symlink => "symlink",
            Self::Mknod => "mknod",
            Self::Remove => "remove",
            Self::Rmdir => "rmdir",
            Self::Rename => "rename",
            Self::Link => "link",
            Self::Readdir => "readdir",
            Self::Readdirplus => "readdirplus",
            Self::Fsstat => "fsstat",
            Self::Fsinfo => "fsinfo",
            Self::Pathconf => "pathconf",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for Nfs3Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
