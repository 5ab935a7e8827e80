use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("unknown grade letter `{0}`")]
    UnknownGrade(String),
}

impl EngineError {
    pub(crate) fn invalid(reason: &'static str) -> Self {
        Self::InvalidInput { reason }
    }
}
