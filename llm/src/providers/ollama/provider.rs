use super::generate::api::ListModelsResponse;
use super::generate::model::OllamaCompletionModel;
use crate::client::Client;
use crate::{CompletionModel, ModelProvider};
use async_trait::async_trait;
use std::sync::Arc;

pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn default() -> Self {
        Self::new("http://localhost:11434")
    }

    pub fn new(base_url: &str) -> Self {
        OllamaProvider {
            client: Client::default(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    async fn list_models(&self) -> anyhow::Result<Vec<crate::ModelDefinition>> {
        let url = format!("{}/api/tags", self.base_url);
        let response: ListModelsResponse = self.client.get(&url).await?;
        Ok(response.models.into_iter().map(|m| m.into()).collect())
    }

    fn create_completion_model(&self, model_name: &str) -> Option<Arc<dyn CompletionModel>> {
        Some(Arc::new(OllamaCompletionModel::new(
            self.client.clone(),
            self.base_url.clone(),
            model_name.to_string(),
        )))
    }
}
