use std::fmt;

use super::PixelFormat;

/// Error raised by an engine entry point.
///
/// The coordinator has no fallback rendering path, so every variant is
/// treated as non-recoverable by the layers above.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// The engine cannot build pipelines for this surface format.
    UnsupportedPixelFormat(PixelFormat),

    /// Any other engine-side failure, tagged with the entry point that raised it.
    Engine { op: &'static str, message: String },
}

impl BoundaryError {
    pub fn engine(op: &'static str, message: impl Into<String>) -> Self {
        Self::Engine {
            op,
            message: message.into(),
        }
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPixelFormat(format) => {
                write!(f, "engine does not support pixel format {format}")
            }
            Self::Engine { op, message } => write!(f, "engine failed in {op}: {message}"),
        }
    }
}

impl std::error::Error for BoundaryError {}
