//! Translation backend.
//!
//! [`Translator`] is the seam the command handlers depend on; [`GoogleTranslator`]
//! is the HTTP implementation used by the running bot.

mod google;
mod language;

use mockall::automock;
use thiserror::Error;

pub use crate::translator::{google::GoogleTranslator, language::Language};

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Detects and translates free text.
#[automock]
pub trait Translator {
    /// Returns the backend code of the language `text` is written in (e.g. `es`, `ja`).
    async fn detect_language(&self, text: &str) -> Result<String, TranslatorError>;
    /// Translates `text` into `target`, the source language being detected by the backend.
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslatorError>;
}
