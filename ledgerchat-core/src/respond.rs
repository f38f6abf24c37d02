//! (question, query, result) → natural-language answer

use crate::db::Rows;
use crate::error::{ExecutionError, TranslationError};
use crate::prompt::ResponsePrompt;
use crate::schema::SchemaDescription;
use askama::Template;
use llm::{CompletionModel, CompletionRequest};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Turns an execution outcome into prose with a single completion call.
///
/// A failed execution is not hidden: its message goes into the prompt's
/// result slot verbatim so the model can explain the failure to the user.
/// The completion text comes back unmodified; no factual grounding check
/// is performed on the answer.
pub struct ResponseGenerator {
    model: Arc<dyn CompletionModel>,
    timeout: Duration,
}

impl ResponseGenerator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self::with_timeout(model, DEFAULT_COMPLETION_TIMEOUT)
    }

    pub fn with_timeout(model: Arc<dyn CompletionModel>, timeout: Duration) -> Self {
        ResponseGenerator { model, timeout }
    }

    pub async fn respond(
        &self,
        question: &str,
        query: &str,
        outcome: &Result<Rows, ExecutionError>,
        schema: &SchemaDescription,
    ) -> Result<String, TranslationError> {
        let result = match outcome {
            Ok(rows) => rows.to_string(),
            Err(e) => e.to_string(),
        };

        let prompt = ResponsePrompt::new(schema.as_str(), question, query, &result)
            .render()
            .map_err(|e| TranslationError::Completion {
                message: e.to_string(),
            })?;

        let request = CompletionRequest::new(prompt);
        match tokio::time::timeout(self.timeout, self.model.complete(&request)).await {
            Ok(Ok(completion)) => Ok(completion.text),
            Ok(Err(e)) => Err(TranslationError::Completion {
                message: e.to_string(),
            }),
            Err(_) => Err(TranslationError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}
