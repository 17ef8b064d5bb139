//! Trading chat assistant backed by the OpenAI chat completions API.
//!
//! The assistant never computes signals itself. Callers pass in the latest
//! [`Signal`] for a pair and it is rendered into the prompt as context.

use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::excerpt;
use crate::types::Signal;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_ROLE: &str = "You are an expert trading assistant.";
const MAX_TOKENS: u32 = 600;
const TEMPERATURE: f64 = 0.2;
const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat completion errors.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat API response had no message content")]
    MissingContent,
}

/// Answers trading questions, optionally with a signal snapshot as context.
pub struct ChatAssistant {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl ChatAssistant {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(CHAT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Answer `question`. Without an API key a placeholder reply echoing the
    /// question and context is returned instead of calling the model.
    pub async fn reply(&self, question: &str, snapshot: Option<&Signal>) -> Result<String, ChatError> {
        let enrichment = render_enrichment(snapshot);

        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No OpenAI key configured, returning placeholder reply");
            return Ok(placeholder_reply(question, &enrichment));
        };

        let request_body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_ROLE},
                {"role": "user", "content": build_prompt(question, &enrichment)}
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI returned {}: {}", status, excerpt(&body, 200));
            return Err(ChatError::Status { status, body });
        }

        let body: Value = response.json().await?;
        extract_content(&body)
    }
}

/// Context block for a signal. Unavailable signals get a short notice.
pub fn render_enrichment(snapshot: Option<&Signal>) -> String {
    match snapshot {
        None => String::new(),
        Some(signal) if signal.is_unavailable() => {
            "\n\n(Unable to attach latest signal information.)".to_string()
        }
        Some(signal) => {
            let flat = signal.flat();
            format!(
                "\n\nLatest technical snapshot for {} ({}):\nSignal: {}\nTP: {}\nSL: {}\n",
                field(&flat, "pair"),
                field(&flat, "timeframe"),
                field(&flat, "signal"),
                field(&flat, "take_profit"),
                field(&flat, "stop_loss"),
            )
        }
    }
}

/// Full user prompt sent to the model.
pub fn build_prompt(question: &str, enrichment: &str) -> String {
    format!(
        "You are a polite, concise trading assistant. Give useful, practical trading guidance.\n\
         User question: {}{}\n\nAnswer clearly and include risk reminders.",
        question, enrichment
    )
}

fn placeholder_reply(question: &str, enrichment: &str) -> String {
    format!(
        "OpenAI API key is not configured. You asked: '{}'. {} \
         Set OPENAI_API_KEY to enable AI responses.",
        question,
        enrichment.trim()
    )
}

fn field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "none".to_string(),
        Some(other) => other.to_string(),
    }
}

fn extract_content(body: &Value) -> Result<String, ChatError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(ChatError::MissingContent)
}
