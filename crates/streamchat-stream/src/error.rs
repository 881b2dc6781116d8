use thiserror::Error;

/// A stream that ended with a transport failure.
///
/// Whatever was buffered before the failure is kept; nothing is rolled back.
#[derive(Debug, Error)]
#[error("error during streaming: {cause:#}")]
pub struct StreamError {
    partial: String,
    cause: anyhow::Error,
}

impl StreamError {
    pub fn new(partial: String, cause: anyhow::Error) -> Self {
        Self { partial, cause }
    }

    /// Response text accepted before the failure
    pub fn partial_response(&self) -> &str {
        &self.partial
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    pub fn into_parts(self) -> (String, anyhow::Error) {
        (self.partial, self.cause)
    }
}
