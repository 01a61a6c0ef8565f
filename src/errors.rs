use std::fmt;

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    /// The named namespace (`"ns"`) or resource (`"ns/name"`) does not exist.
    NotFound(String),
    /// A same-kind resource or namespace with this name already exists.
    Conflict(String),
    /// The user's home directory could not be determined.
    NoHome,
    /// Filesystem I/O error.
    Io(std::io::Error),
    /// The configuration document could not be parsed or serialized.
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "not found: {}", key),
            StoreError::Conflict(key) => write!(f, "already exists: {}", key),
            StoreError::NoHome => write!(f, "cannot determine home directory"),
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Parse(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_key() {
        let err = StoreError::NotFound("default/ctrl1".into());
        assert_eq!(err.to_string(), "not found: default/ctrl1");

        let err = StoreError::Conflict("default".into());
        assert_eq!(err.to_string(), "already exists: default");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }
}
