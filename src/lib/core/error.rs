use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Todo {0} not found")]
    NotFound(Uuid),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

impl IntoResponse for TodoError {
    fn into_response(self) -> axum::response::Response {
        match self {
            TodoError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            TodoError::Validation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
            }
            TodoError::Database(_) | TodoError::Migration(_) | TodoError::CorruptRow(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %self, "Request failed in storage");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage failure").into_response()
            }
        }
    }
}
