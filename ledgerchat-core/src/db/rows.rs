//! Result-set types shared by every database implementation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Int(v) => write!(f, "{}", v),
            // Debug formatting keeps the trailing ".0" on whole floats,
            // which is the shape the few-shot examples establish.
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Text(v) => write!(f, "'{}'", v),
        }
    }
}

/// An ordered result set: column names plus row tuples, exactly as the
/// driver produced them. No post-processing, no type coercion.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Rows { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Rows {
    /// Renders the tuple-list shape the prompt examples use: `[(3,)]`,
    /// `[('0124110001', 12.5)]`, `[]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "(")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            if row.len() == 1 {
                write!(f, ",")?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}
