//! Database capability and the components built on top of it
//!
//! The capability is split the same way the completion side splits
//! provider and model: a `DatabaseDriver` opens handles, a `Database`
//! handle runs queries. Test doubles implement both without a server.

use async_trait::async_trait;
use std::sync::Arc;

mod connection;
mod executor;
pub mod mysql;
mod rows;

pub use connection::{ConnectionManager, ConnectionParameters};
pub use executor::QueryExecutor;
pub use rows::{Rows, Value};

/// An open handle to a relational engine.
///
/// `run` submits the query text as-is; the dialect is whatever the
/// connected engine accepts. Implementations report failures as plain
/// errors, classification happens in [`QueryExecutor`].
#[async_trait]
pub trait Database: Send + Sync {
    async fn run(&self, query: &str) -> anyhow::Result<Rows>;
}

/// Opens [`Database`] handles from connection parameters.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    async fn open(&self, params: &ConnectionParameters) -> anyhow::Result<Arc<dyn Database>>;
}
