//! Splitting of mixed Japanese text into word-like segments.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Kanji,
    Hiragana,
    Katakana,
    Space,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' | '々' => {
            CharClass::Kanji
        }
        '\u{3041}'..='\u{309F}' => CharClass::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            CharClass::Katakana
        }
        c if c.is_whitespace() => CharClass::Space,
        _ => CharClass::Other,
    }
}

/// Splits `text` into runs of the same script.
///
/// Hiragana directly following kanji stays in the kanji segment (okurigana and
/// particles), so `食べる` is one segment. Whitespace separates segments and is
/// dropped.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    // (segment start, class that opened the segment, class of the previous char)
    let mut current: Option<(usize, CharClass, CharClass)> = None;

    for (index, c) in text.char_indices() {
        let class = classify(c);

        if let Some((start, opening, previous)) = current {
            let continues = class == previous
                || (opening == CharClass::Kanji && class == CharClass::Hiragana);
            if class != CharClass::Space && continues {
                current = Some((start, opening, class));
                continue;
            }
            segments.push(&text[start..index]);
            current = None;
        }

        if class != CharClass::Space {
            current = Some((index, class, class));
        }
    }

    if let Some((start, _, _)) = current {
        segments.push(&text[start..]);
    }

    segments
}
