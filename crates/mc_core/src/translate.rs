use mc_deepl::{target_lang_for_locale, DeepLClient, DeepLError};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translation service failed: {0}")]
    Service(String),
}

impl From<DeepLError> for TranslateError {
    fn from(err: DeepLError) -> Self {
        TranslateError::Service(err.to_string())
    }
}

/// External translation boundary. An empty string means the service
/// produced no translation.
pub trait Translator: Send + Sync {
    fn translate(&self, source: &str, locale: &str, credential: &str)
        -> Result<String, TranslateError>;
}

pub struct DeepLTranslator {
    client: DeepLClient,
}

impl DeepLTranslator {
    pub fn new(client: DeepLClient) -> Self {
        Self { client }
    }
}

impl Translator for DeepLTranslator {
    fn translate(
        &self,
        source: &str,
        locale: &str,
        credential: &str,
    ) -> Result<String, TranslateError> {
        let target = target_lang_for_locale(locale);
        tracing::debug!(locale, target = %target, "deepl target code");
        Ok(self
            .client
            .translate(source, &target, credential)?
            .unwrap_or_default())
    }
}
