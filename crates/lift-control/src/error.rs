use thiserror::Error;

/// Failure raised by control logic.  Never fatal to the simulation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("control logic failed: {0}")]
    Failed(String),

    #[error("control logic panicked: {0}")]
    Panicked(String),
}

impl ControlError {
    /// Shorthand for `ControlError::Failed(msg.into())`.
    pub fn failed(msg: impl Into<String>) -> Self {
        ControlError::Failed(msg.into())
    }
}

pub type ControlResult<T> = Result<T, ControlError>;
