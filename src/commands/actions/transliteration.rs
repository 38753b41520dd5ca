//! Japanese transliteration command handler.

use log::{debug, error};

use crate::{
    commands::{
        CommandError, Interaction, ScriptIssue,
        command::TEXT_ARGUMENT,
        reply::{Field, Reply, render},
        responses::SEPARATOR_FIELD,
    },
    script::{ScriptConverter, ScriptSegment},
    translator::{Language, Translator},
};

pub const TITLE: &str = "Traducción JP";
const JAPANESE_CODE: &str = "ja";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResult {
    pub segments: Vec<ScriptSegment>,
    pub translation: String,
}

/// Decimal digits, ASCII or fullwidth. Kanji numerals and other numeric
/// characters are text.
fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

fn is_digits_only(text: &str) -> bool {
    let mut chars = text.chars().filter(|c| !c.is_whitespace()).peekable();
    chars.peek().is_some() && chars.all(is_digit)
}

/// Decomposes Japanese `text` and translates it to English.
///
/// Digit-only input is refused before any backend call.
pub async fn transliterate<T: Translator, S: ScriptConverter>(
    translator: &T,
    converter: &S,
    text: &str,
) -> Result<ScriptResult, CommandError> {
    if is_digits_only(text) {
        return Err(CommandError::InvalidScript(ScriptIssue::DigitsOnly));
    }

    let detected = translator.detect_language(text).await.map_err(|e| {
        error!("language detection failed: {}", e);
        CommandError::TranslationBackend
    })?;
    if detected != JAPANESE_CODE {
        debug!("refusing text detected as {}", detected);
        return Err(CommandError::InvalidScript(ScriptIssue::NotJapanese));
    }

    let segments = converter.convert(text);

    let translation = translator
        .translate(text, Language::English)
        .await
        .map_err(|e| {
            error!("translation failed: {}", e);
            CommandError::TranslationBackend
        })?;

    Ok(ScriptResult {
        segments,
        translation,
    })
}

/// Handles the `traduccion_jap` command.
///
/// # Arguments
///
/// * `translator` - Used to check the text is Japanese and to translate it
/// * `converter` - Splits the text into segments with their readings
/// * `interaction` - Carries the text, already checked for presence and length
///
/// # Returns
///
/// - `Ok(Reply)`: per segment the original, hiragana and romaji fields and a
///   separator, then the English translation
/// - `Err(CommandError::InvalidScript)`: only digits, or not Japanese
/// - `Err(CommandError::TranslationBackend)`: the backend failed
pub async fn handle_transliteration<T: Translator, S: ScriptConverter>(
    translator: &T,
    converter: &S,
    interaction: &Interaction,
) -> Result<Reply, CommandError> {
    debug!("handling transliteration command");

    let text = interaction.argument(TEXT_ARGUMENT).unwrap_or_default().trim();
    let result = transliterate(translator, converter, text).await?;

    let mut fields: Vec<Field> = result
        .segments
        .into_iter()
        .flat_map(|segment| {
            [
                Field::block("Japonés", segment.original),
                Field::inline("Hiragana", segment.hiragana),
                Field::inline("Romaji", segment.romaji),
                Field::block(SEPARATOR_FIELD, ""),
            ]
        })
        .collect();
    fields.push(Field::block("Traducción:", result.translation));

    Ok(render(TITLE, fields))
}
