//! Unified error type for mezzwatch.
//!
//! Library modules funnel their failures into [`Error`]; the binary wraps
//! them in `anyhow` at the command boundary.

/// Unified error type covering all failure modes in mezzwatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be loaded or is invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// The external encoder (or its lookup) failed.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Tool error.
    pub fn tool<T: Into<String>, M: Into<String>>(tool: T, message: M) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using the mezzwatch Error type.
pub type Result<T> = std::result::Result<T, Error>;
