use thiserror::Error;

/// Failures seen by `TodoClient` and `TodoStore`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Todo not found")]
    NotFound,
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
