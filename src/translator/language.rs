//! Languages a translation can target.

use std::fmt;

/// One of the supported translation targets.
///
/// The set is closed: anything the bot translates into is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    English,
    French,
    Italian,
    German,
    Japanese,
    Arabic,
    ChineseSimplified,
    Russian,
    Korean,
    Portuguese,
    Latin,
    Hebrew,
    Catalan,
}

impl Language {
    pub const ALL: [Language; 14] = [
        Language::Spanish,
        Language::English,
        Language::French,
        Language::Italian,
        Language::German,
        Language::Japanese,
        Language::Arabic,
        Language::ChineseSimplified,
        Language::Russian,
        Language::Korean,
        Language::Portuguese,
        Language::Latin,
        Language::Hebrew,
        Language::Catalan,
    ];

    /// Code understood by the translation backend.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
            Language::French => "fr",
            Language::Italian => "it",
            Language::German => "de",
            Language::Japanese => "ja",
            Language::Arabic => "ar",
            Language::ChineseSimplified => "zh-CN",
            Language::Russian => "ru",
            Language::Korean => "ko",
            Language::Portuguese => "pt",
            Language::Latin => "la",
            Language::Hebrew => "iw",
            Language::Catalan => "ca",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Spanish => "spanish",
            Language::English => "english",
            Language::French => "french",
            Language::Italian => "italian",
            Language::German => "german",
            Language::Japanese => "japanese",
            Language::Arabic => "arabic",
            Language::ChineseSimplified => "chinese (simplified)",
            Language::Russian => "russian",
            Language::Korean => "korean",
            Language::Portuguese => "portuguese",
            Language::Latin => "latin",
            Language::Hebrew => "hebrew",
            Language::Catalan => "catalan",
        }
    }

    /// Looks a language up by its backend code.
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Every accepted code, in declaration order.
    pub fn codes() -> Vec<&'static str> {
        Language::ALL.iter().map(Language::code).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
