/// Normalize text for matching
///
/// Lowercases, strips punctuation and collapses whitespace runs to a single
/// space. Letters, combining marks and digits of any script survive, so
/// Devanagari keywords keep their vowel signs.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !is_punctuation(*c))
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_punctuation(c: char) -> bool {
    if c == '_' {
        return false;
    }
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    matches!(
        c,
        // General Punctuation (quotes, dashes, ellipsis); the spaces in this
        // block are whitespace and handled by the split below
        '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{205E}'
            // Devanagari danda and double danda
            | '\u{0964}' | '\u{0965}'
            | '¡' | '¿' | '«' | '»' | '·' | '§' | '¶'
            // Fullwidth and CJK punctuation
            | '\u{3001}' | '\u{3002}' | '\u{FF01}' | '\u{FF0C}' | '\u{FF0E}' | '\u{FF1F}'
    )
}
