//! Question → candidate query

use crate::error::TranslationError;
use crate::prompt::QueryPrompt;
use crate::schema::SchemaDescription;
use askama::Template;
use llm::{CompletionModel, CompletionRequest};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Turns a natural-language question into a candidate query string with a
/// single completion call.
///
/// The output is returned raw: no guarantee it is syntactically valid SQL,
/// and no sanitation happens between here and execution. Validation is
/// deferred entirely to the executor, whose failure containment is the
/// only guard. Known gap; see DESIGN.md.
pub struct QueryTranslator {
    model: Arc<dyn CompletionModel>,
    timeout: Duration,
}

impl QueryTranslator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self::with_timeout(model, DEFAULT_COMPLETION_TIMEOUT)
    }

    pub fn with_timeout(model: Arc<dyn CompletionModel>, timeout: Duration) -> Self {
        QueryTranslator { model, timeout }
    }

    pub async fn translate(
        &self,
        question: &str,
        schema: &SchemaDescription,
    ) -> Result<String, TranslationError> {
        let prompt = QueryPrompt::new(schema.as_str(), question)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaDescriptor;
    use async_trait::async_trait;
    use llm::Completion;
    use std::sync::Mutex;

    struct RecordingModel {
        response: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingModel {
        fn returning(response: &str) -> Self {
            RecordingModel {
                response: Ok(response.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            RecordingModel {
                response: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionModel for RecordingModel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            match &self.response {
                Ok(text) => Ok(Completion::new(text)),
                Err(message) => anyhow::bail!("{}", message),
            }
        }
    }

    #[tokio::test]
    async fn test_translate_returns_raw_completion() {
        let model = Arc::new(RecordingModel::returning(
            "SELECT COUNT(*) FROM inventory_transactions;",
        ));
        let translator = QueryTranslator::new(Arc::clone(&model) as Arc<dyn CompletionModel>);
        let descriptor = SchemaDescriptor::fixed();

        let query = translator
            .translate("How many transactions are there?", descriptor.describe())
            .await
            .unwrap();
        assert_eq!(query, "SELECT COUNT(*) FROM inventory_transactions;");
    }

    #[tokio::test]
    async fn test_translate_makes_exactly_one_call_with_schema_and_question() {
        let model = Arc::new(RecordingModel::returning("SELECT 1;"));
        let translator = QueryTranslator::new(Arc::clone(&model) as Arc<dyn CompletionModel>);
        let descriptor = SchemaDescriptor::fixed();

        translator
            .translate("How many parts are below zero?", descriptor.describe())
            .await
            .unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("inventory_transactions"));
        assert!(prompts[0].contains("How many parts are below zero?"));
    }

    #[tokio::test]
    async fn test_unreachable_model_is_a_translation_error() {
        let model = Arc::new(RecordingModel::failing("connection refused"));
        let translator = QueryTranslator::new(model as Arc<dyn CompletionModel>);
        let descriptor = SchemaDescriptor::fixed();

        let result = translator.translate("anything", descriptor.describe()).await;
        assert_eq!(
            result,
            Err(TranslationError::Completion {
                message: "connection refused".to_string()
            })
        );
    }

    struct StallingModel;

    #[async_trait]
    impl CompletionModel for StallingModel {
        fn name(&self) -> &str {
            "stalling"
        }

        async fn complete(&self, _request: &CompletionRequest) -> anyhow::Result<Completion> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Completion::default())
        }
    }

    #[tokio::test]
    async fn test_stalled_model_surfaces_timeout() {
        let translator =
            QueryTranslator::with_timeout(Arc::new(StallingModel), Duration::from_millis(20));
        let descriptor = SchemaDescriptor::fixed();

        let result = translator.translate("anything", descriptor.describe()).await;
        assert_eq!(result, Err(TranslationError::Timeout { seconds: 0 }));
    }
}
