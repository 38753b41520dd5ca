//! Translation command handler.
//!
//! Without an explicit target, Spanish text is translated to English and any
//! other language to Spanish. An explicit target is always honoured.

use log::{debug, error};

use crate::{
    commands::{
        CommandError, Interaction,
        command::TEXT_ARGUMENT,
        reply::{Field, Reply, render},
        responses::{format_nothing_sent, format_translated_as, format_user_sent},
    },
    translator::{Language, Translator, TranslatorError},
};

pub const TITLE: &str = "Traducción";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub source: String,
    pub target: Language,
    pub translated: String,
}

/// Picks the target language from the detected source language.
pub fn resolve_target(detected: &str, explicit: Option<Language>) -> Language {
    if let Some(target) = explicit {
        return target;
    }

    match detected.to_lowercase().as_str() {
        "es" | "spanish" => Language::English,
        _ => Language::Spanish,
    }
}

/// Translates `text`, detecting its language only when no target is given.
///
/// # Arguments
///
/// * `translator` - Translation backend
/// * `text` - Non empty text to translate
/// * `explicit` - Target chosen by the user, always honoured
///
/// # Returns
///
/// - `Ok(TranslationResult)`: source text, target and translation
/// - `Err(TranslatorError)`: detection or translation failed
pub async fn translate_text<T: Translator>(
    translator: &T,
    text: &str,
    explicit: Option<Language>,
) -> Result<TranslationResult, TranslatorError> {
    let target = match explicit {
        Some(target) => target,
        None => {
            let detected = translator.detect_language(text).await?;
            debug!("detected language {}", detected);
            resolve_target(&detected, None)
        }
    };

    let translated = translator.translate(text, target).await?;

    Ok(TranslationResult {
        source: text.to_owned(),
        target,
        translated,
    })
}

/// Handles the `traduccion` command.
///
/// Reads the free text and the optional `idioma` argument from the
/// interaction. An empty text is not an error, the user is told nothing was
/// sent.
///
/// # Returns
///
/// - `Ok(Reply)`: the sent text and its translation, or the nothing sent notice
/// - `Err(CommandError::TranslationBackend)`: the backend failed; its detail is
///   only logged
pub async fn handle_translation<T: Translator>(
    translator: &T,
    interaction: &Interaction,
) -> Result<Reply, CommandError> {
    debug!("handling translation command");

    let text = interaction.argument(TEXT_ARGUMENT).unwrap_or_default().trim();
    if text.is_empty() {
        return Ok(render(
            TITLE,
            vec![Field::block(format_nothing_sent(&interaction.user_name), "")],
        ));
    }

    // Validation already rejected codes outside the supported set
    let explicit = interaction.argument("idioma").and_then(Language::from_code);

    let result = translate_text(translator, text, explicit)
        .await
        .map_err(|e| {
            error!("translation failed: {}", e);
            CommandError::TranslationBackend
        })?;

    debug!("translated to {}", result.target);

    Ok(render(
        TITLE,
        vec![
            Field::block(format_user_sent(&interaction.user_name), result.source),
            Field::block(format_translated_as(), result.translated),
        ],
    ))
}
