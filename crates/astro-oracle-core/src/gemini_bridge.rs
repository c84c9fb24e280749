//! Gemini Bridge: single `generateContent` round trip over the Gemini REST API.
//!
//! System and user messages are flattened into one structured prompt (system block first,
//! then user block). No retries and no streaming; the client carries a bounded timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OracleConfig;
use crate::generator::{GenerationError, TextGenerator};
use crate::prompts::{PromptMessage, Role};

pub struct GeminiBridge {
    enabled: bool,
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

impl GeminiBridge {
    pub fn new(config: &OracleConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.gemini_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Gemini client builder failed ({}); using a client without timeout", e);
                reqwest::Client::new()
            });
        Self {
            enabled: config.gemini_enabled(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_base: config.gemini_api_base.clone(),
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Joins system texts and user texts into the two-block prompt the model receives.
pub fn flatten_prompt(messages: &[PromptMessage]) -> String {
    let join = |role: Role| {
        messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };
    let system = join(Role::System);
    let user = join(Role::User);

    let mut prompt = String::new();
    if !system.is_empty() {
        prompt.push_str("### System Instructions\n");
        prompt.push_str(system.trim());
        prompt.push_str("\n\n");
    }
    prompt.push_str("### User Input\n");
    prompt.push_str(user.trim());
    prompt
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl Candidate {
    fn texts(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
    }
}

/// Text of the first candidate; when that is blank, every candidate's non-empty parts
/// joined by newlines. `None` when neither yields anything.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let primary: String = response
        .candidates
        .first()
        .map(|c| c.texts().collect())
        .unwrap_or_default();
    if !primary.trim().is_empty() {
        return Some(primary);
    }

    let joined = response
        .candidates
        .iter()
        .flat_map(|c| c.texts())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

fn transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        return GenerationError::Timeout;
    }
    let class = if e.is_connect() {
        "ConnectError"
    } else if e.is_decode() {
        "DecodeError"
    } else if e.is_body() {
        "BodyError"
    } else if e.is_request() {
        "RequestError"
    } else {
        "TransportError"
    };
    GenerationError::Transport(format!("{}: {}", class, e))
}

#[async_trait]
impl TextGenerator for GeminiBridge {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, GenerationError> {
        if !self.enabled {
            return Err(GenerationError::Disabled);
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: flatten_prompt(messages),
                }],
            }],
        };

        tracing::debug!(model = %self.model, "Gemini generateContent requested");

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let text = res.text().await.map_err(transport_error)?;
        if !status.is_success() {
            let snippet: String = text.chars().take(300).collect();
            return Err(GenerationError::Transport(format!(
                "HttpStatusError: {} {}",
                status.as_u16(),
                snippet
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::Transport(format!("DecodeError: {}", e)))?;

        let reply = extract_text(&parsed).ok_or(GenerationError::EmptyOutput)?;
        tracing::info!(model = %self.model, chars = reply.len(), "Gemini reply received");
        Ok(reply)
    }
}
