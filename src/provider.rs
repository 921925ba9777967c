//! Completion provider speaking the OpenAI chat completions protocol.
//!
//! Both OpenAI and DeepSeek expose this protocol, only the base URL and key differ.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY`, `OPENAI_API_KEY_2` — keys of seat 1 and seat 2 for ChatGPT agents
//! - `DEEPSEEK_API_KEY`, `DEEPSEEK_API_KEY_2` — same for DeepSeek agents
//! - `OPENAI_BASE_URL`, `DEEPSEEK_BASE_URL` — override the endpoints
//! - `OPENAI_MODEL`, `DEEPSEEK_MODEL` — override the models
//!
//! When the `_2` key is not set, both seats share the first key.

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    agent::{Player, ProviderKind, Seat},
    configuration::PairingMode,
    game_interface::{Completion, CompletionProvider},
};

/// Where and how to reach one provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderSettings {
    /// Default endpoint and model of `kind` with the given key.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            base_url: kind.default_base_url().to_owned(),
            api_key: api_key.into(),
            model: kind.default_model().to_owned(),
        }
    }

    /// Settings of the agent of `kind` sitting in `seat`, read from the environment.
    ///
    /// # Error
    /// Returned when no API key is set for `kind`.
    pub fn from_env(kind: ProviderKind, seat: Seat) -> anyhow::Result<Self> {
        let prefix = match kind {
            ProviderKind::ChatGpt => "OPENAI",
            ProviderKind::DeepSeek => "DEEPSEEK",
        };
        let key_var = format!("{prefix}_API_KEY");

        let api_key = match seat {
            Seat::One => std::env::var(&key_var).ok(),
            Seat::Two => std::env::var(format!("{key_var}_2"))
                .or_else(|_| std::env::var(&key_var))
                .ok(),
        };
        let Some(api_key) = api_key.filter(|k| !k.is_empty()) else {
            bail!("{key_var} is not set");
        };

        let mut settings = Self::new(kind, api_key);
        if let Ok(url) = std::env::var(format!("{prefix}_BASE_URL")) {
            settings.base_url = url;
        }
        if let Ok(model) = std::env::var(format!("{prefix}_MODEL")) {
            settings.model = model;
        }
        Ok(settings)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    reasoning_content: Option<String>,
}

/// Blocking client for an OpenAI compatible `/chat/completions` endpoint.
pub struct OpenAiCompatibleProvider {
    settings: ProviderSettings,
    http: reqwest::blocking::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(settings: ProviderSettings) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("could not create HTTP client")?;
        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

impl CompletionProvider for OpenAiCompatibleProvider {
    #[instrument(skip(self, system, user), fields(url = %self.settings.base_url))]
    fn complete(&self, model: &str, system: &str, user: &str) -> anyhow::Result<Completion> {
        let request = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("HTTP {status}: {body}");
        }

        let chat_response: ChatResponse = response.json().context("malformed response body")?;
        let Some(choice) = chat_response.choices.into_iter().next() else {
            bail!("response has no choices");
        };
        debug!("completion received");

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            reasoning_content: choice.message.reasoning_content,
        })
    }
}

/// Builds both players of `mode` with settings read from the environment.
///
/// Each seat gets its own client, so same-provider pairings can use one key per seat.
pub fn players_from_env(mode: PairingMode) -> anyhow::Result<(Player, Player)> {
    let (kind_1, kind_2) = mode.seats();
    Ok((
        player_from_env(kind_1, Seat::One)?,
        player_from_env(kind_2, Seat::Two)?,
    ))
}

fn player_from_env(kind: ProviderKind, seat: Seat) -> anyhow::Result<Player> {
    let settings = ProviderSettings::from_env(kind, seat)
        .with_context(|| format!("no credentials for {seat}"))?;
    let model = settings.model.clone();
    let provider = OpenAiCompatibleProvider::new(settings)?;
    Ok(Player::new(kind, Arc::new(provider)).with_model(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = ProviderSettings::new(ProviderKind::DeepSeek, "key");
        assert_eq!(settings.base_url, "https://api.deepseek.com/v1");
        assert_eq!(settings.model, "deepseek-chat");
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let mut settings = ProviderSettings::new(ProviderKind::ChatGpt, "key");
        settings.base_url = "http://localhost:8080/v1/".to_owned();
        let provider = OpenAiCompatibleProvider::new(settings).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn key_is_not_printed() {
        let settings = ProviderSettings::new(ProviderKind::ChatGpt, "sk-secret");
        assert!(!format!("{settings:?}").contains("sk-secret"));
    }

    #[test]
    fn response_with_reasoning_only() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null,"reasoning_content":"Choice: Red\nReasoning: r"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        let message = &parsed.choices[0].message;
        assert!(message.content.is_none());
        assert_eq!(message.reasoning_content.as_deref(), Some("Choice: Red\nReasoning: r"));
    }
}
