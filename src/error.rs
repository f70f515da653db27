//! Error types for swingtrack-rs.

use thiserror::Error;

/// Invalid tracker, session or display configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("frame rate must be finite and positive, got {0}")]
    FrameRate(f32),

    #[error("normalization factor must be finite and positive, got {0}")]
    NormalizationFactor(f32),

    #[error("display size must be non-zero, got {width}x{height}")]
    DisplaySize { width: f32, height: f32 },

    #[error("sink capacity must be at least 1")]
    SinkCapacity,
}

/// Failure to acquire frames from a frame source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No frame-producing device was found, or access was denied.
    #[error("frame source unavailable: {0}")]
    Unavailable(String),

    #[error("frame source IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by session control.
///
/// Per-frame problems never show up here; they are absorbed by the pipeline.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),

    #[error("frame worker panicked; session parts were lost")]
    WorkerPanicked,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FrameRate(0.0);
        assert!(err.to_string().contains("frame rate"));
        assert!(err.to_string().contains('0'));
    }

    #[test]
    fn test_source_error_into_session_error() {
        let err: SessionError = SourceError::Unavailable("no camera".to_string()).into();
        match err {
            SessionError::SourceUnavailable(SourceError::Unavailable(msg)) => {
                assert_eq!(msg, "no camera");
            }
            _ => panic!("Expected SourceUnavailable"),
        }
    }

    #[test]
    fn test_source_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SourceError = io_err.into();
        assert!(matches!(err, SourceError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
