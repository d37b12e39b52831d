use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use uuid::Uuid;
use crate::core::{NewTodo, Todo, TodoError, TodoPatch};
use crate::storage::TodoStorage;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Directory served for every path the API does not claim. `/` maps to
    /// its `index.html`.
    pub static_dir: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
        }
    }
}

pub struct HttpTransport<S: TodoStorage + 'static> {
    storage: Arc<S>,
    config: HttpConfig,
}

impl<S: TodoStorage + 'static> HttpTransport<S> {
    pub fn new(storage: Arc<S>, config: HttpConfig) -> Self {
        Self { storage, config }
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http();
        #[cfg(feature = "tracing")]
        let trace_layer = trace_layer.make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        });

        Router::new()
            .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
            .route(
                "/todos/{id}",
                get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>),
            )
            .with_state(self.storage.clone())
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .layer(trace_layer)
    }

    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serves until `signal` resolves, then drains in-flight requests.
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        #[cfg(feature = "tracing")]
        info!(addr = ?listener.local_addr().ok(), static_dir = ?self.config.static_dir, "HTTP server started");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
    }
}

async fn list_todos<S: TodoStorage + 'static>(
    State(storage): State<Arc<S>>,
) -> Result<Json<Vec<Todo>>, TodoError> {
    let todos = storage.list_todos().await?;
    #[cfg(feature = "tracing")]
    debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

async fn get_todo<S: TodoStorage + 'static>(
    State(storage): State<Arc<S>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, TodoError> {
    Ok(Json(storage.get_todo(id).await?))
}

async fn create_todo<S: TodoStorage + 'static>(
    State(storage): State<Arc<S>>,
    Json(new_todo): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), TodoError> {
    let todo = storage.create_todo(new_todo).await?;
    #[cfg(feature = "tracing")]
    debug!(id = %todo.id, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo<S: TodoStorage + 'static>(
    State(storage): State<Arc<S>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Todo>, TodoError> {
    patch.validate_for(id)?;
    let todo = storage.update_todo(id, patch).await?;
    #[cfg(feature = "tracing")]
    debug!(id = %id, "Updated todo");
    Ok(Json(todo))
}

async fn delete_todo<S: TodoStorage + 'static>(
    State(storage): State<Arc<S>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, TodoError> {
    let todo = storage.delete_todo(id).await?;
    #[cfg(feature = "tracing")]
    debug!(id = %id, "Deleted todo");
    Ok(Json(todo))
}
