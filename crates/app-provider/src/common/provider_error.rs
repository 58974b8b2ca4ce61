use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to create client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
    #[error("Provider result must be a JSON object")]
    NotAnObject,
    #[error("Malformed provider result: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Provider task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
