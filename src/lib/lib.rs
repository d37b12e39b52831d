//! A small todo service: an axum REST backend persisting todos in SQLite
//! through sqlx, static file serving for the index page, and a client-side
//! store that mirrors the server's collection over HTTP.

pub mod adapters;
pub mod client;
pub mod config;
pub mod core;
pub mod storage;


pub use adapters::{HttpConfig, HttpTransport};
pub use client::{ClientConfig, ClientError, SyncStrategy, TodoClient, TodoStore};
pub use config::ServerConfig;
pub use crate::core::{NewTodo, Todo, TodoError, TodoPatch};
pub use storage::{sqlite::SqliteStorage, TodoStorage};
