//! OpenAI-compatible chat-completion client (OpenRouter by default)

use base64::Engine as _;
use std::time::Duration;

use super::SuggestionSource;
use super::prompt::build_prompt;
use super::reply::{parse_candidates, reply_text};
use crate::config::SnapNameConfig;
use crate::error::{Error, Result, Stage};
use crate::locator::ScreenshotFile;

pub struct OpenRouterClient {
    endpoint: String,
    model: String,
    /// Name of the variable the credential came from, for error messages
    api_key_env: String,
    api_key: Option<String>,
    timeout: Duration,
    attach_image: bool,
    max_candidates: usize,
}

impl OpenRouterClient {
    /// Build a client, reading the credential from the configured variable
    pub fn from_config(config: &SnapNameConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
            attach_image: config.attach_image,
            max_candidates: config.max_candidates,
        }
    }

    #[cfg(test)]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Auth(self.api_key_env.clone()))
    }

    /// JSON request body for `shot`
    fn request_body(&self, shot: &ScreenshotFile) -> Result<serde_json::Value> {
        let mut content = vec![serde_json::json!({
            "type": "text",
            "text": build_prompt(shot, self.attach_image),
        })];

        if self.attach_image {
            let bytes = std::fs::read(&shot.path)
                .map_err(|e| Error::io(Stage::Suggest, &shot.path, e))?;
            let data_url = format!(
                "data:image/png;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(&bytes)
            );
            content.push(serde_json::json!({
                "type": "image_url",
                "image_url": { "url": data_url },
            }));
        }

        Ok(serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
        }))
    }

    fn network_error(&self, source: reqwest::Error) -> Error {
        Error::Network {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

impl SuggestionSource for OpenRouterClient {
    fn suggest(&self, shot: &ScreenshotFile) -> Result<Vec<String>> {
        // Checked before anything touches the network
        let api_key = self.api_key()?;
        let body = self.request_body(shot)?;

        log::info!(
            "Requesting filename suggestions from {} (model {}, image attached: {})",
            self.endpoint,
            self.model,
            self.attach_image
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.network_error(e))?;

        let resp = client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "snapname")
            .json(&body)
            .send()
            .map_err(|e| self.network_error(e))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| self.network_error(e))?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text.trim().to_string(),
            });
        }

        let reply = reply_text(&text)?;
        log::debug!("Model reply: {}", reply);
        let candidates = parse_candidates(&reply, self.max_candidates)?;
        log::info!("Received {} filename suggestions", candidates.len());
        Ok(candidates)
    }
}
