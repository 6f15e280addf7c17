use thiserror::Error;

pub type Result<T> = std::result::Result<T, WheelError>;

#[derive(Debug, Error)]
pub enum WheelError {
    /// A spin was requested while the wheel has no slices.
    #[error("add at least one entry before spinning")]
    EmptyEntryList,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },
}

impl WheelError {
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }

    /// Whether the error should be shown to the user as a notice rather than logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::EmptyEntryList | Self::InvalidSettings { .. })
    }
}
