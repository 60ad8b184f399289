use thiserror::Error;

/// Fixed reason carried by [`PolycutError::PathNotClosed`].
pub const PATH_NOT_CLOSED: &str = "path is not closed";

/// Errors that can occur while preparing geometry or generating programs.
#[derive(Error, Debug)]
pub enum PolycutError {
    /// A path that must be closed has its endpoints further apart than the tolerance.
    #[error("path is not closed")]
    PathNotClosed,

    /// The requested workpiece does not fit the working area of the machine.
    #[error(
        "workpiece {width}x{height} mm does not fit the working area ({max_width}x{max_height} mm)"
    )]
    WorkpieceTooLarge {
        width: f64,
        height: f64,
        max_width: f64,
        max_height: f64,
    },

    /// No machine with the given identifier exists.
    #[error("unknown machine: {0}")]
    UnknownMachine(String),
}

impl PolycutError {
    /// Short human readable reason, without any wrapping context.
    pub fn reason(&self) -> String {
        match self {
            PolycutError::PathNotClosed => PATH_NOT_CLOSED.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for the core operations.
pub type PolycutResult<T> = Result<T, PolycutError>;
