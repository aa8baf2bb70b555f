use std::fmt;

/// Result alias used throughout the engine for recoverable, caller-facing errors.
///
/// Contract violations (calling a data command with no active transaction, looking
/// up a transaction id that was never registered, etc.) are programmer errors and
/// are not represented here -- they panic instead, per the engine's error handling
/// design.
pub type CResult<T> = std::result::Result<T, Error>;

/// Recoverable errors returned to a command's caller.
///
/// `Display` produces the stable string identities the dispatcher's callers key
/// off of ("no such key", "write-write conflict", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No version of the key was visible to the reading transaction.
    NoSuchKey,
    /// The committing transaction and an overlapping committed transaction both
    /// wrote the same key.
    WriteWriteConflict,
    /// A Serializable transaction read a key that an overlapping committed
    /// transaction subsequently wrote.
    ReadWriteConflict,
    /// The dispatcher was given a command it does not recognize.
    Unimplemented(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchKey => write!(f, "no such key"),
            Error::WriteWriteConflict => write!(f, "write-write conflict"),
            Error::ReadWriteConflict => write!(f, "read-write conflict"),
            Error::Unimplemented(_cmd) => write!(f, "unimplemented"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_strings_are_stable() {
        assert_eq!(Error::NoSuchKey.to_string(), "no such key");
        assert_eq!(Error::WriteWriteConflict.to_string(), "write-write conflict");
        assert_eq!(Error::ReadWriteConflict.to_string(), "read-write conflict");
        assert_eq!(Error::Unimplemented("frobnicate".into()).to_string(), "unimplemented");
    }
}
