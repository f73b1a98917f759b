//! Arabic ordinal words for chapter numbering.
//!
//! Shared by marker extraction (ordinal word → number) and chapter title
//! synthesis (number → ordinal word). Covers 1..=13, the configured
//! maximum chapter count; numbers past the table fall back to digits.

/// Ordinal words in number order, index 0 = "first".
pub static ORDINAL_WORDS: &[&str] = &[
    "الأول",
    "الثاني",
    "الثالث",
    "الرابع",
    "الخامس",
    "السادس",
    "السابع",
    "الثامن",
    "التاسع",
    "العاشر",
    "الحادي عشر",
    "الثاني عشر",
    "الثالث عشر",
];

/// Resolve an ordinal word to its 1-based number.
///
/// Matching happens on normalized text as well, so both "الأول" and
/// "الاول" resolve.
pub fn ordinal_to_number(word: &str) -> Option<u32> {
    let trimmed = word.trim();
    ORDINAL_WORDS
        .iter()
        .position(|w| *w == trimmed || normalize_alef(w) == normalize_alef(trimmed))
        .map(|idx| idx as u32 + 1)
}

/// Render a chapter number as an ordinal word, or digits past the table.
pub fn number_to_ordinal(number: u32) -> String {
    if number >= 1 && (number as usize) <= ORDINAL_WORDS.len() {
        ORDINAL_WORDS[number as usize - 1].to_string()
    } else {
        number.to_string()
    }
}

/// Parse a digit group that may use Arabic-Indic digits (٠–٩).
pub fn parse_digits(s: &str) -> Option<u32> {
    let folded: String = s
        .trim()
        .chars()
        .map(|c| match c {
            '٠'..='٩' => char::from_u32('0' as u32 + (c as u32 - '٠' as u32)).unwrap_or(c),
            _ => c,
        })
        .collect();
    folded.parse().ok()
}

fn normalize_alef(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{0622}' | '\u{0623}' | '\u{0625}' => '\u{0627}',
            c => c,
        })
        .collect()
}
