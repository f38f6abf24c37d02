//! Core pipeline for chatting with an inventory ledger
//!
//! This crate turns natural-language questions into SQL, runs the SQL
//! against a relational store, and turns the result back into prose:
//! - **Capabilities**: `CompletionModel` (from the `llm` crate) and
//!   `Database`/`DatabaseDriver`, both injected so test doubles need no
//!   servers
//! - **Components**: `SchemaDescriptor`, `ConnectionManager`,
//!   `QueryExecutor`, `QueryTranslator`, `ResponseGenerator`
//! - **Orchestration**: `ChatSession`, one strictly sequential turn at a
//!   time over an append-only transcript

pub mod db;
pub mod error;
pub mod prompt;
pub mod respond;
pub mod schema;
pub mod session;
pub mod translate;

pub use db::{
    ConnectionManager, ConnectionParameters, Database, DatabaseDriver, QueryExecutor, Rows, Value,
};
pub use db::mysql::MySqlDriver;
pub use error::{ConnectionError, ExecutionError, TranslationError};
pub use respond::ResponseGenerator;
pub use schema::{SchemaDescription, SchemaDescriptor};
pub use session::{ChatSession, Role, Turn};
pub use translate::QueryTranslator;
