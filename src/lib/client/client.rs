use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use crate::client::ClientError;
use crate::core::{NewTodo, Todo, TodoPatch};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Async HTTP client for the todo API, one method per endpoint.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.http.get(self.todos_url()).send().await?;
        decode(response).await
    }

    pub async fn get_todo(&self, id: Uuid) -> Result<Todo, ClientError> {
        let response = self.http.get(self.todo_url(id)).send().await?;
        decode(response).await
    }

    pub async fn create_todo(&self, new_todo: &NewTodo) -> Result<Todo, ClientError> {
        let response = self.http.post(self.todos_url()).json(new_todo).send().await?;
        decode(response).await
    }

    pub async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, ClientError> {
        let response = self.http.put(self.todo_url(id)).json(patch).send().await?;
        decode(response).await
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<Todo, ClientError> {
        let response = self.http.delete(self.todo_url(id)).send().await?;
        decode(response).await
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: Uuid) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    #[cfg(feature = "tracing")]
    debug!(status = status.as_u16(), url = %response.url(), "Received response");
    if status.is_success() {
        return Ok(response.json().await?);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
