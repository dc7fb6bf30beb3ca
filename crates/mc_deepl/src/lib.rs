//! Minimal DeepL v2 `/translate` client used by the catalog editor.

mod client;
mod lang;

pub use client::{
    parse_translation_body, DeepLClient, DeepLConfig, DeepLError, DEFAULT_ENDPOINT,
    DEFAULT_TIMEOUT_SECS,
};
pub use lang::target_lang_for_locale;
