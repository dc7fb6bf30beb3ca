use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, trace};

pub const DEFAULT_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const LOG_BODY_LIMIT: usize = 120;

#[derive(Debug, thiserror::Error)]
pub enum DeepLError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("deepl returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid deepl response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    text: String,
}

#[derive(Debug, Clone)]
pub struct DeepLClient {
    http: Client,
    endpoint: String,
}

impl DeepLClient {
    pub fn new(config: DeepLConfig) -> Result<Self, DeepLError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Translates `text` into `target_lang` (already in DeepL form, e.g. `DE`).
    ///
    /// `Ok(None)` means the service answered without a translation.
    pub fn translate(
        &self,
        text: &str,
        target_lang: &str,
        auth_key: &str,
    ) -> Result<Option<String>, DeepLError> {
        let target_lang = target_lang.replace('_', "-");
        debug!(
            endpoint = %self.endpoint,
            target_lang = %target_lang,
            chars = text.chars().count(),
            "deepl request"
        );
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {auth_key}"))
            .form(&[("text", text), ("target_lang", target_lang.as_str())])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        trace!(status = status.as_u16(), body = %truncate(&body, LOG_BODY_LIMIT), "deepl response");
        if !status.is_success() {
            return Err(DeepLError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_translation_body(&body)
    }
}

/// Extracts the first translation from a DeepL JSON body.
pub fn parse_translation_body(body: &str) -> Result<Option<String>, DeepLError> {
    let parsed: TranslateResponse = serde_json::from_str(body)?;
    Ok(parsed
        .translations
        .into_iter()
        .next()
        .map(|item| item.text)
        .filter(|text| !text.is_empty()))
}

fn truncate(input: &str, limit: usize) -> &str {
    match input.char_indices().nth(limit) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
