use serde::{Deserialize, Serialize};

/// A fully rendered prompt to be sent to a completion model.
///
/// The prompt carries everything the model needs in a single piece of text;
/// there is no multi-turn context beyond what the caller embeds in it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        CompletionRequest {
            prompt: prompt.into(),
        }
    }
}

impl From<&str> for CompletionRequest {
    fn from(prompt: &str) -> Self {
        CompletionRequest::new(prompt)
    }
}

impl From<String> for CompletionRequest {
    fn from(prompt: String) -> Self {
        CompletionRequest::new(prompt)
    }
}

/// The free-form text a completion model produced for a request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Completion {
    pub text: String,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Completion { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_from_str() {
        let request = CompletionRequest::from("How many parts are in stock?");
        assert_eq!(request.prompt, "How many parts are in stock?");
    }

    #[test]
    fn test_completion_request_serialization() {
        let request = CompletionRequest::new("count the rows");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"prompt":"count the rows"}"#);
    }

    #[test]
    fn test_completion_round_trip() {
        let completion = Completion::new("There are 3 transactions.");
        let json = serde_json::to_string(&completion).unwrap();
        let back: Completion = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text(), "There are 3 transactions.");
    }
}
