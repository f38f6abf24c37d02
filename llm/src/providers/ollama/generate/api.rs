use crate::CompletionRequest;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct ModelDetails {
    pub(crate) format: Option<String>,
    pub(crate) family: Option<String>,
    pub(crate) families: Option<Vec<String>>,
    pub(crate) parameter_size: Option<String>,
    pub(crate) quantization_level: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct ModelDefinition {
    pub(crate) name: String,
    pub(crate) details: Option<ModelDetails>,
}

impl From<ModelDefinition> for crate::ModelDefinition {
    fn from(model: ModelDefinition) -> Self {
        // Embedding models carry a single embed-flavored family marker;
        // everything else is usable for text generation.
        let is_embedding = model
            .details
            .as_ref()
            .and_then(|details| details.families.as_ref())
            .is_some_and(|families| {
                families.len() == 1
                    && families.iter().any(|f| f.to_lowercase().contains("embed"))
            });

        let capabilities = if is_embedding {
            vec![crate::ModelCapability::Embedding]
        } else {
            vec![crate::ModelCapability::Text]
        };

        crate::ModelDefinition::new(model.name, capabilities)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct ListModelsResponse {
    pub(crate) models: Vec<ModelDefinition>,
}

// Ollama representation of a single-shot generate call.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct GenerateRequest {
    pub(crate) model: String,

    pub(crate) prompt: String,

    pub(crate) stream: bool,
}

impl GenerateRequest {
    pub(crate) fn from_completion_request(model_name: &str, value: &CompletionRequest) -> Self {
        GenerateRequest {
            model: model_name.to_string(),
            prompt: value.prompt.clone(),
            stream: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct GenerateResponse {
    pub(crate) response: String,

    #[serde(flatten)]
    pub(crate) extra: serde_json::Value,
}

impl From<GenerateResponse> for crate::Completion {
    fn from(response: GenerateResponse) -> Self {
        crate::Completion::new(response.response)
    }
}
