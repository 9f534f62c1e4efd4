use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybookError {
    #[error("not initialized: run 'playbook init'")]
    NotInitialized,

    #[error("exercise not found: {0}")]
    ExerciseNotFound(String),

    #[error("exercise already exists: {0}")]
    ExerciseExists(String),

    #[error("no response saved for exercise: {0}")]
    ResponseNotFound(String),

    #[error("response for '{0}' is completed and read-only: reopen it first")]
    ResponseCompleted(String),

    #[error("cannot complete '{exercise}': missing {missing}")]
    RequirementsNotMet { exercise: String, missing: String },

    #[error("invalid modality: {0}")]
    InvalidModality(String),

    #[error("invalid requirement policy '{0}': expected required, not-required, or or")]
    InvalidPolicy(String),

    #[error("modality '{0}' does not take attachments")]
    NotAttachable(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PlaybookError>;
