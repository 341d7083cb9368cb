use thiserror::Error;

#[derive(Error, Debug)]
pub enum LawpointError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
