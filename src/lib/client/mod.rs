pub mod client;
pub mod error;
pub mod store;

pub use client::*;
pub use error::*;
pub use store::*;
