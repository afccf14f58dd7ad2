use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CandyError>;

#[derive(Error, Debug)]
pub enum CandyError {
    /// A required node, target or path could not be located. `reason` names
    /// the lookup that failed.
    #[error("The project cannot be found with {reason}")]
    NotFound { reason: String },

    /// The loaded object graph is not a tree.
    #[error("Invalid project tree: {0}")]
    InvalidTree(String),

    #[error("Manifest already exists at {}", .0.display())]
    WriteConflict(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Manifest(#[from] serde_json::Error),
}

impl CandyError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    /// The failed lookup, if this is a `NotFound`.
    pub fn not_found_reason(&self) -> Option<&str> {
        match self {
            Self::NotFound { reason } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CandyError::not_found("applicationTargets");
        assert_eq!(
            err.to_string(),
            "The project cannot be found with applicationTargets"
        );
        assert_eq!(err.not_found_reason(), Some("applicationTargets"));
    }

    #[test]
    fn test_io_errors_pass_through() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CandyError::from(io);
        assert_eq!(err.to_string(), "denied");
        assert!(err.not_found_reason().is_none());
    }
}
