use std::str::FromStr;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;
use crate::core::{NewTodo, Todo, TodoError, TodoPatch};
use crate::storage::TodoStorage;

#[cfg(feature = "tracing")]
use tracing::{debug, info, instrument};

const SELECT_TODOS: &str = "SELECT id, title, content FROM todos ORDER BY rowid";
const SELECT_TODO: &str = "SELECT id, title, content FROM todos WHERE id = ?";
const INSERT_TODO: &str = "INSERT INTO todos (id, title, content) VALUES (?, ?, ?)
                 RETURNING id, title, content";
const UPDATE_TODO: &str = "UPDATE todos
                 SET title = COALESCE(?, title), content = COALESCE(?, content)
                 WHERE id = ?
                 RETURNING id, title, content";
const DELETE_TODO: &str = "DELETE FROM todos WHERE id = ? RETURNING id, title, content";

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: String,
    title: String,
    content: String,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| TodoError::CorruptRow(format!("invalid id {:?}: {}", row.id, e)))?;
        Ok(Todo {
            id,
            title: row.title,
            content: row.content,
        })
    }
}

/// SQLite-backed todo storage. Owns the connection pool; the schema is
/// brought up to date by the embedded migrations on construction.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if missing) the database at `database_url`.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        #[cfg(feature = "tracing")]
        info!(database_url = %database_url, max_connections, "SQLite pool opened");
        Self::migrate(pool).await
    }

    /// In-memory database. Each SQLite connection gets its own memory
    /// database, so the pool is pinned to a single connection that never
    /// expires.
    pub async fn new_memory() -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, TodoError> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStorage for SqliteStorage {
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    async fn list_todos(&self) -> Result<Vec<Todo>, TodoError> {
        let rows: Vec<TodoRow> = sqlx::query_as(SELECT_TODOS).fetch_all(&self.pool).await?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    async fn get_todo(&self, id: Uuid) -> Result<Todo, TodoError> {
        let row: Option<TodoRow> = sqlx::query_as(SELECT_TODO)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(TodoError::NotFound(id))?.try_into()
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, new_todo)))]
    async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, TodoError> {
        let id = Uuid::new_v4();
        let row: TodoRow = sqlx::query_as(INSERT_TODO)
            .bind(id.to_string())
            .bind(new_todo.title)
            .bind(new_todo.content)
            .fetch_one(&self.pool)
            .await?;
        #[cfg(feature = "tracing")]
        debug!(id = %id, "Inserted todo");
        row.try_into()
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, patch)))]
    async fn update_todo(&self, id: Uuid, patch: TodoPatch) -> Result<Todo, TodoError> {
        let row: Option<TodoRow> = sqlx::query_as(UPDATE_TODO)
            .bind(patch.title)
            .bind(patch.content)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(TodoError::NotFound(id))?.try_into()
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    async fn delete_todo(&self, id: Uuid) -> Result<Todo, TodoError> {
        let row: Option<TodoRow> = sqlx::query_as(DELETE_TODO)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(TodoError::NotFound(id))?.try_into()
    }

    async fn close(&self) {
        self.pool.close().await;
        #[cfg(feature = "tracing")]
        info!("SQLite pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_list_returns_inserted_rows_in_order() {
        let storage = SqliteStorage::new_memory().await.unwrap();
        let first = storage.create_todo(NewTodo::new("first", "a")).await.unwrap();
        let second = storage.create_todo(NewTodo::new("second", "b")).await.unwrap();
        assert_ne!(first.id, second.id);

        let todos = storage.list_todos().await.unwrap();
        assert_eq!(todos, vec![first, second]);
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let storage = SqliteStorage::new_memory().await.unwrap();
        let todo = storage.create_todo(NewTodo::new("Buy milk", "2%")).await.unwrap();

        let updated = storage
            .update_todo(todo.id, TodoPatch::title("Buy oat milk"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.content, "2%");

        let unchanged = storage.update_todo(todo.id, TodoPatch::default()).await.unwrap();
        assert_eq!(unchanged, updated);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let storage = SqliteStorage::new_memory().await.unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(storage.get_todo(id).await, Err(TodoError::NotFound(missing)) if missing == id));
        assert!(matches!(
            storage.update_todo(id, TodoPatch::title("x")).await,
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(storage.delete_todo(id).await, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_returns_snapshot_and_removes_row() {
        let storage = SqliteStorage::new_memory().await.unwrap();
        let todo = storage.create_todo(NewTodo::new("gone", "soon")).await.unwrap();

        let deleted = storage.delete_todo(todo.id).await.unwrap();
        assert_eq!(deleted, todo);
        assert!(storage.list_todos().await.unwrap().is_empty());
        assert!(matches!(storage.delete_todo(todo.id).await, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn corrupt_id_surfaces_as_error() {
        let storage = SqliteStorage::new_memory().await.unwrap();
        sqlx::query("INSERT INTO todos (id, title, content) VALUES ('not-a-uuid', 't', 'c')")
            .execute(&storage.pool)
            .await
            .unwrap();
        assert!(matches!(storage.list_todos().await, Err(TodoError::CorruptRow(_))));
    }
}
