use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipforgeError {
    #[error("unknown transform: {0}")]
    TransformNotFound(String),

    #[error("preset not found: {0}")]
    PresetNotFound(String),

    #[error("invalid name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidName(String),

    #[error("invalid operation '{input}': {reason}")]
    InvalidOperation { input: String, reason: String },

    #[error("no cached operation list to replay")]
    NoLastRun,

    #[error("required tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClipforgeError>;
