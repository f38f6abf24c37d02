//! Query execution with failure containment

use super::{ConnectionManager, Rows};
use crate::error::ExecutionError;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs query strings against the manager's active handle.
///
/// Every driver-level failure is caught and classified here; a raw fault
/// never escapes into the session. The executor never touches the handle
/// slot itself, it only reads whatever the manager currently holds.
pub struct QueryExecutor {
    connection: Arc<ConnectionManager>,
    timeout: Duration,
}

impl QueryExecutor {
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self::with_timeout(connection, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(connection: Arc<ConnectionManager>, timeout: Duration) -> Self {
        QueryExecutor {
            connection,
            timeout,
        }
    }

    pub async fn execute(&self, query: &str) -> Result<Rows, ExecutionError> {
        let Some(handle) = self.connection.handle().await else {
            return Err(ExecutionError::NotConnected);
        };

        tracing::debug!(query, "executing query");
        match tokio::time::timeout(self.timeout, handle.run(query)).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => Err(ExecutionError::Driver {
                message: e.to_string(),
            }),
            Err(_) => Err(ExecutionError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}
