//! HTTP client for the Google translate endpoint.

use std::time::Duration;

use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use crate::translator::{Language, Translator, TranslatorError};

/// Translator backed by the public `translate_a/single` endpoint.
///
/// A single request returns both the translated sentences and the detected
/// source language, so detection reuses the translate call with English as target.
pub struct GoogleTranslator {
    /// Base URL, without trailing slash
    url: String,
    client: Client,
}

impl GoogleTranslator {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, TranslatorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(GoogleTranslator {
            url: url.to_string(),
            client,
        })
    }

    async fn request(&self, text: &str, target: &str) -> Result<Value, TranslatorError> {
        let url = format!("{}/translate_a/single", &self.url);
        debug!("request {} to {}", &url, target);

        let body: Value = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {}", &url, &body);

        Ok(body)
    }
}

/// Concatenates the translated sentences found at `[0][i][0]`.
fn parse_translation(body: &Value) -> Result<String, TranslatorError> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslatorError::UnexpectedResponse("missing sentences".to_owned()))?;

    let translation: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if translation.is_empty() {
        return Err(TranslatorError::UnexpectedResponse(
            "empty translation".to_owned(),
        ));
    }

    Ok(translation)
}

/// Reads the detected source language at index `2`.
fn parse_detected_language(body: &Value) -> Result<String, TranslatorError> {
    body.get(2)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| TranslatorError::UnexpectedResponse("missing source language".to_owned()))
}

impl Translator for GoogleTranslator {
    async fn detect_language(&self, text: &str) -> Result<String, TranslatorError> {
        info!("detect language");
        let body = self.request(text, Language::English.code()).await?;
        parse_detected_language(&body)
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslatorError> {
        info!("translate to {}", target.name());
        let body = self.request(text, target.code()).await?;
        parse_translation(&body)
    }
}
