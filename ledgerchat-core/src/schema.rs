//! Schema description given to both prompt-building steps
//!
//! The same text grounds query generation and answer generation, so the
//! model's queries and explanations stay consistent with the actual table
//! shape.

use crate::db::{QueryExecutor, Value};
use crate::error::ExecutionError;
use std::fmt;

/// The fixed build-time description of the inventory ledger.
const INVENTORY_SCHEMA: &str = "\
Table: inventory_transactions
Columns:
- PartNo: VARCHAR(50)
- TransactionDate: DATE
- InQty: DECIMAL(10, 2)
- OutQty: DECIMAL(10, 2)
- Balance: DECIMAL(10, 2)";

const INTROSPECTION_QUERY: &str = "\
SELECT TABLE_NAME, COLUMN_NAME, COLUMN_TYPE \
FROM information_schema.columns \
WHERE TABLE_SCHEMA = DATABASE() \
ORDER BY TABLE_NAME, ORDINAL_POSITION";

/// Immutable textual contract describing the queryable columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDescription(String);

impl SchemaDescription {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies the schema text for prompt construction.
///
/// `describe` is idempotent and side-effect-free, and works whether or not
/// a connection is active: the fixed text lets the model draft a query
/// speculatively before any connect.
pub struct SchemaDescriptor {
    description: SchemaDescription,
}

impl SchemaDescriptor {
    /// The fixed build-time description.
    pub fn fixed() -> Self {
        SchemaDescriptor {
            description: SchemaDescription(INVENTORY_SCHEMA.to_string()),
        }
    }

    /// Describe the connected database via `information_schema`, falling
    /// back to the fixed text when introspection is not possible.
    pub async fn introspect(executor: &QueryExecutor) -> Self {
        match Self::live_description(executor).await {
            Ok(description) => SchemaDescriptor { description },
            Err(e) => {
                tracing::debug!(error = %e, "schema introspection unavailable, using fixed description");
                Self::fixed()
            }
        }
    }

    pub fn describe(&self) -> &SchemaDescription {
        &self.description
    }

    async fn live_description(
        executor: &QueryExecutor,
    ) -> Result<SchemaDescription, ExecutionError> {
        let rows = executor.execute(INTROSPECTION_QUERY).await?;
        if rows.is_empty() {
            return Err(ExecutionError::Driver {
                message: "information_schema returned no columns".to_string(),
            });
        }

        let mut text = String::new();
        let mut current_table: Option<String> = None;
        for row in &rows.rows {
            let [table, column, column_type] = row.as_slice() else {
                continue;
            };
            let table = render_cell(table);
            if current_table.as_deref() != Some(table.as_str()) {
                if current_table.is_some() {
                    text.push('\n');
                }
                text.push_str(&format!("Table: {}\nColumns:\n", table));
                current_table = Some(table);
            }
            text.push_str(&format!(
                "- {}: {}\n",
                render_cell(column),
                render_cell(column_type)
            ));
        }

        Ok(SchemaDescription(text.trim_end().to_string()))
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        other => other.to_string(),
    }
}
