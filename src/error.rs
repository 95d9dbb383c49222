use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkyError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),
    #[error("preference store error: {0}")]
    Preferences(String),
}
