use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to serialize map configuration")]
    Serialize(#[from] serde_json::Error),
}
