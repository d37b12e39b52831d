use uuid::Uuid;
use crate::client::{ClientError, TodoClient};
use crate::core::{NewTodo, Todo, TodoPatch};

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

/// How the store refreshes its collection after a successful mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Reload the whole list from the server. Costs one extra request per
    /// mutation; the local view matches the server after every call.
    #[default]
    Reload,
    /// Apply the server's response to the local list. No extra request, but
    /// writes from other clients stay invisible until the next `load`.
    ApplyLocally,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub strategy: SyncStrategy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            strategy: SyncStrategy::default(),
        }
    }
}

/// Client-side mirror of the server's todo collection.
///
/// The collection is never authoritative. A failed call leaves it as it was.
#[derive(Debug)]
pub struct TodoStore {
    client: TodoClient,
    strategy: SyncStrategy,
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(TodoClient::new(&config.base_url), config.strategy)
    }

    pub fn with_client(client: TodoClient, strategy: SyncStrategy) -> Self {
        Self {
            client,
            strategy,
            todos: Vec::new(),
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.todos = self.client.list_todos().await?;
        #[cfg(feature = "tracing")]
        debug!(count = self.todos.len(), "Loaded todos");
        Ok(())
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, new_todo)))]
    pub async fn create(&mut self, new_todo: &NewTodo) -> Result<(), ClientError> {
        let created = self.client.create_todo(new_todo).await?;
        match self.strategy {
            SyncStrategy::Reload => self.load().await,
            SyncStrategy::ApplyLocally => {
                self.todos.push(created);
                Ok(())
            }
        }
    }

    /// Sends the whole todo, id included, as the update body.
    #[cfg_attr(feature = "tracing", instrument(skip(self, updated), fields(id = %updated.id)))]
    pub async fn update(&mut self, updated: &Todo) -> Result<(), ClientError> {
        let saved = self
            .client
            .update_todo(updated.id, &TodoPatch::from(updated))
            .await?;
        match self.strategy {
            SyncStrategy::Reload => self.load().await,
            SyncStrategy::ApplyLocally => {
                match self.todos.iter_mut().find(|todo| todo.id == saved.id) {
                    Some(slot) => *slot = saved,
                    None => self.todos.push(saved),
                }
                Ok(())
            }
        }
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn remove(&mut self, id: Uuid) -> Result<(), ClientError> {
        let removed = self.client.delete_todo(id).await?;
        match self.strategy {
            SyncStrategy::Reload => self.load().await,
            SyncStrategy::ApplyLocally => {
                self.todos.retain(|todo| todo.id != removed.id);
                Ok(())
            }
        }
    }

    /// Fetches one todo straight from the server. The local collection is
    /// not touched; list entries may lack fields an edit view needs.
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn fetch_one(&self, id: Uuid) -> Result<Todo, ClientError> {
        self.client.get_todo(id).await
    }
}
