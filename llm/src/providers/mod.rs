pub mod ollama;

pub use ollama::provider::OllamaProvider;
