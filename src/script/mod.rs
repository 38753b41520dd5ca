//! Japanese script decomposition.
//!
//! Splits Japanese text into segments and gives each one its hiragana reading
//! and its Hepburn romanization.

mod segment;

use log::debug;
use mockall::automock;

use crate::script::segment::split_segments;

/// One piece of the decomposed input, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSegment {
    pub original: String,
    pub hiragana: String,
    pub romaji: String,
}

#[automock]
pub trait ScriptConverter {
    /// Decomposes `text` into ordered segments. Whitespace never produces a segment.
    fn convert(&self, text: &str) -> Vec<ScriptSegment>;
}

/// Converter backed by the kakasi dictionary.
#[derive(Default)]
pub struct KakasiConverter;

impl ScriptConverter for KakasiConverter {
    fn convert(&self, text: &str) -> Vec<ScriptSegment> {
        let segments: Vec<ScriptSegment> = split_segments(text)
            .into_iter()
            .map(|original| {
                let converted = kakasi::convert(original);
                ScriptSegment {
                    original: original.to_owned(),
                    hiragana: converted.hiragana.trim().to_owned(),
                    romaji: converted.romaji.trim().to_owned(),
                }
            })
            .collect();

        debug!("converted {} into {} segments", text, segments.len());

        segments
    }
}
