use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the royalty pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A statement file could not be opened or read from disk.
    #[error("Failed to read statement file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV stream could not be decoded or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A persisted ledger row could not be parsed back into a typed record.
    #[error("Malformed ledger row in {path} (line {line}): {reason}")]
    LedgerParse {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the pipeline crates.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PipelineError::FileRead {
            path: PathBuf::from("/statements/25-01.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read statement file"));
        assert!(msg.contains("/statements/25-01.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_ledger_parse() {
        let err = PipelineError::LedgerParse {
            path: PathBuf::from("/out/ledger.csv"),
            line: 17,
            reason: "invalid float literal".to_string(),
        };
        let msg = err.to_string();
        assert_eq!(
            msg,
            "Malformed ledger row in /out/ledger.csv (line 17): invalid float literal"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = PipelineError::Config("unknown stage".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown stage");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PipelineError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
