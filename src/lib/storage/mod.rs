pub mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;
use crate::core::{NewTodo, Todo, TodoError, TodoPatch};

#[async_trait]
pub trait TodoStorage: Send + Sync {
    async fn list_todos(&self) -> Result<Vec<Todo>, TodoError>;
    async fn get_todo(&self, id: Uuid) -> Result<Todo, TodoError>;
    async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, TodoError>;
    async fn update_todo(&self, id: Uuid, patch: TodoPatch) -> Result<Todo, TodoError>;
    async fn delete_todo(&self, id: Uuid) -> Result<Todo, TodoError>;
    async fn close(&self);
}
