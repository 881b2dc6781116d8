use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("model '{model}' not found on the server")]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
