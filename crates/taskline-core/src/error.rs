use thiserror::Error;

/// Single domain-error channel. Every variant carries a display-ready
/// message the presentation shell can show verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Storage(String),
}

impl PlannerError {
    pub fn message(&self) -> &str {
        match self {
            PlannerError::Parse(msg)
            | PlannerError::Validation(msg)
            | PlannerError::Storage(msg) => msg,
        }
    }
}
