//! Storage errors
//!
//! Every failure here is reported to the user as a notice; the in-memory
//! quotes stay usable whatever happens to the slots.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// ENOSPC and EDQUOT on Linux
const DISK_FULL_OS_CODES: [i32; 2] = [28, 122];

/// A failed slot read or write
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot create quote storage at '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied on '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left for '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend caps total bytes and this write would pass the cap
    #[error("Storage quota exceeded writing '{key}' ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("Cannot read slot '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write slot '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file was written but could not replace the slot
    #[error("Cannot move '{from}' into place at '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot encode value for slot '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Classify an I/O failure on a write path
    ///
    /// Permission and out-of-space failures get their own variants so the
    /// caller can offer a fix; the rest are plain write errors.
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                path,
                source: error,
            }
        } else if is_disk_full_error(&error) {
            StorageError::DiskFull {
                path,
                source: error,
            }
        } else {
            StorageError::WriteError {
                path,
                source: error,
            }
        }
    }

    /// Classify an I/O failure on a read path
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ => StorageError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Whether the user can fix the cause (free space, fix permissions)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::DiskFull { .. }
                | StorageError::QuotaExceeded { .. }
                | StorageError::PermissionDenied { .. }
        )
    }

    /// A hint to show next to the error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        let hint = match self {
            StorageError::DiskFull { .. } => "Free up disk space and try again.",
            StorageError::QuotaExceeded { .. } => {
                "Export your quotes to a file, then clear some to make room."
            }
            StorageError::PermissionDenied { .. } => {
                "Check permissions, or point data_dir somewhere writable."
            }
            StorageError::CreateDirectory { .. } => {
                "Check that the parent directory exists and is writable."
            }
            _ => return None,
        };
        Some(hint)
    }
}

fn is_disk_full_error(error: &io::Error) -> bool {
    if let Some(code) = error.raw_os_error() {
        return DISK_FULL_OS_CODES.contains(&code);
    }
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("disk full")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/data/quotes"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let by_message = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::from_io(by_message, PathBuf::from("/full/disk"));
        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert!(err.is_recoverable());

        let by_code = io::Error::from_raw_os_error(28);
        let err = StorageError::from_io(by_code, PathBuf::from("/full/disk"));
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_other_io_is_write_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "device went away");
        let err = StorageError::from_io(io_err, PathBuf::from("/data/quotes"));

        assert!(matches!(err, StorageError::WriteError { .. }));
        assert!(!err.is_recoverable());
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_read_classification() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let err = StorageError::from_read(io_err, PathBuf::from("/data/quotes"));
        assert!(matches!(err, StorageError::ReadError { .. }));

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err = StorageError::from_read(io_err, PathBuf::from("/data/quotes"));
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
    }

    #[test]
    fn test_quota_display() {
        let err = StorageError::QuotaExceeded {
            key: "dynamicQuoteGenerator.quotes".to_string(),
            needed: 120,
            limit: 100,
        };

        let msg = err.to_string();
        assert!(msg.contains("quota exceeded"));
        assert!(msg.contains("dynamicQuoteGenerator.quotes"));
        assert!(err.is_recoverable());
    }
}
