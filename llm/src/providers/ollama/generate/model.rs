use super::api::{GenerateRequest, GenerateResponse};
use crate::client::Client;
use crate::{Completion, CompletionModel, CompletionRequest};
use async_trait::async_trait;
use tracing::{Level, event};

pub struct OllamaCompletionModel {
    client: Client,
    base_url: String,
    model_name: String,
}

impl OllamaCompletionModel {
    pub fn new(client: Client, base_url: String, model_name: String) -> Self {
        OllamaCompletionModel {
            client,
            base_url,
            model_name,
        }
    }
}

#[async_trait]
impl CompletionModel for OllamaCompletionModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion> {
        let url = format!("{}/api/generate", self.base_url);

        let api_request = GenerateRequest::from_completion_request(&self.model_name, request);

        match self.client.post(url, &api_request).await {
            Ok(response) => {
                let response: GenerateResponse = response;
                Ok(response.into())
            }
            Err(e) => {
                event!(Level::DEBUG, model = self.model_name, error = %e);
                Err(e)
            }
        }
    }
}
