use serde::{Deserialize, Serialize};

use crate::engine::error::HintError;

/// Longest region text forwarded to a model.
const MAX_CONTENT_CHARS: usize = 4000;

/// Receives the content of a region the user chose to discuss.
pub trait AssistantBackend {
    fn discuss(&self, content: &str) -> Result<String, HintError>;
}

// ============================================================================
// Ollama Backend
// ============================================================================

pub struct OllamaAssistant {
    pub endpoint: String,
    pub model: String,
}

impl Default for OllamaAssistant {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "qwen2.5:1.5b".to_string(),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaAssistant {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        }
    }

    pub fn build_prompt(&self, content: &str) -> String {
        let excerpt: String = content.chars().take(MAX_CONTENT_CHARS).collect();
        format!(
            "The user selected this region of a web page:\n\n---\n{}\n---\n\n\
             Summarize what it says in a few sentences and point out anything worth following up on.",
            excerpt
        )
    }
}

impl AssistantBackend for OllamaAssistant {
    fn discuss(&self, content: &str) -> Result<String, HintError> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(content),
            stream: false,
        };

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| HintError::AssistantRequest(format!("{}: {}", self.endpoint, e)))?;

        if !response.status().is_success() {
            return Err(HintError::AssistantRequest(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        let body: OllamaResponse = response
            .json()
            .map_err(|e| HintError::AssistantRequest(format!("invalid response body: {}", e)))?;
        Ok(body.response.trim().to_string())
    }
}

// ============================================================================
// Mock Backend (for running without Ollama)
// ============================================================================

pub struct MockAssistant;

impl AssistantBackend for MockAssistant {
    fn discuss(&self, content: &str) -> Result<String, HintError> {
        let words = content.split_whitespace().count();
        let opening: String = content.split_whitespace().take(8).collect::<Vec<_>>().join(" ");
        Ok(format!("Region with {} words, starting: \"{}\"", words, opening))
    }
}
