use std::time::Duration;

use serde_json::json;

/// Served whenever the hosted model cannot be reached; the chat feature
/// degrades instead of failing the request.
pub const FALLBACK_REPLY: &str = "AI service temporarily unavailable.";

const SYSTEM_PROMPT: &str =
    "You are an expert agriculture assistant helping farmers diagnose and treat crop diseases.";
const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const CHAT_MODEL: &str = "gpt-4o-mini";
const MAX_REPLY_TOKENS: u32 = 200;
const SAMPLING_TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum ChatRelayError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion response had no message content")]
    MalformedResponse,
}

/// Outcome of one relay call. `Degraded` is a first-class result, not an
/// error: the route always answers 200 with either variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Answered(String),
    Degraded,
}

impl ChatOutcome {
    pub fn into_reply(self) -> String {
        match self {
            ChatOutcome::Answered(reply) => reply,
            ChatOutcome::Degraded => FALLBACK_REPLY.to_string(),
        }
    }
}

/// Stateless boundary to the hosted language model. Each call forwards the
/// user message under a fixed system instruction with bounded reply length
/// and fixed sampling temperature.
#[derive(Clone)]
pub struct ChatRelay {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl ChatRelay {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to construct HTTP client");
        Self { client, api_key }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("OPENAI_API_KEY").ok())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Never fails: every collaborator error is logged and swallowed into
    /// `ChatOutcome::Degraded`.
    pub async fn relay(&self, message: &str) -> ChatOutcome {
        match self.ask(message).await {
            Ok(reply) => ChatOutcome::Answered(reply),
            Err(e) => {
                log::warn!("chat relay degraded, serving fallback: {e}");
                ChatOutcome::Degraded
            }
        }
    }

    async fn ask(&self, message: &str) -> Result<String, ChatRelayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ChatRelayError::MissingCredential)?;

        let body = json!({
            "model": CHAT_MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": message},
            ],
            "max_tokens": MAX_REPLY_TOKENS,
            "temperature": SAMPLING_TEMPERATURE,
        });

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let reply = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ChatRelayError::MalformedResponse)?;

        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn missing_credential_degrades_instead_of_failing() {
        let relay = ChatRelay::new(None);
        assert_eq!(relay.relay("why are my leaves brown?").await, ChatOutcome::Degraded);
    }

    #[test]
    fn degraded_outcome_serves_the_fixed_fallback() {
        assert_eq!(ChatOutcome::Degraded.into_reply(), FALLBACK_REPLY);
    }

    #[test]
    fn answered_outcome_passes_the_reply_through() {
        let outcome = ChatOutcome::Answered("prune the canopy".to_string());
        assert_eq!(outcome.into_reply(), "prune the canopy");
    }
}
