use async_trait::async_trait;
use std::sync::Arc;

pub mod api;
mod client;
pub mod providers;
pub use api::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelCapability {
    Text,
    Embedding,
}

#[derive(Clone, Debug)]
pub struct ModelDefinition {
    pub id: String,
    pub capabilities: Vec<ModelCapability>,
}

impl ModelDefinition {
    pub fn new(id: impl Into<String>, capabilities: Vec<ModelCapability>) -> Self {
        Self {
            id: id.into(),
            capabilities,
        }
    }

    pub fn text_model(id: impl Into<String>) -> Self {
        Self::new(id, vec![ModelCapability::Text])
    }

    pub fn has_capability(&self, capability: &ModelCapability) -> bool {
        self.capabilities.contains(capability)
    }
}

/// A single-shot text-generation capability.
///
/// One rendered prompt in, one completion out. No streaming, no tool
/// calling, no retry; callers that need those behaviors build them on top.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion>;
}

#[async_trait]
pub trait ModelProvider {
    // List available models from the provider with their capabilities.
    async fn list_models(&self) -> anyhow::Result<Vec<ModelDefinition>>;

    // Get a specific model by name.
    fn create_completion_model(&self, model_name: &str) -> Option<Arc<dyn CompletionModel>>;
}
