//! Tokenization, segmentation and document statistics.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::normalize::ArabicNormalizer;
use crate::stop_words::StopWords;

/// Sentence terminators recognized across Arabic, Latin and Devanagari
/// manuscripts. A newline also ends a sentence.
const SENTENCE_TERMINATORS: &[char] = &['.', '!', '؟', '?', '।', '\n'];

/// Dominant language of a text snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextLanguage {
    /// Predominantly Arabic script
    Arabic,
    /// Mixed Arabic and other scripts
    Mixed,
    /// Predominantly non-Arabic
    Other,
}

impl TextLanguage {
    /// Get the language code.
    pub fn code(&self) -> &'static str {
        match self {
            TextLanguage::Arabic => "ar",
            TextLanguage::Mixed => "mixed",
            TextLanguage::Other => "other",
        }
    }
}

/// Aggregate statistics over one text snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub unique_words: usize,
    pub avg_words_per_sentence: f32,
    pub avg_words_per_paragraph: f32,
    /// unique words / total words, in [0, 1]
    pub vocabulary_richness: f32,
}

/// A keyword and its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFreq {
    pub word: String,
    pub freq: usize,
}

/// Configuration for the text analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum sentence length in chars; shorter fragments are noise from
    /// abbreviations and headers.
    pub min_sentence_chars: usize,
    /// Minimum paragraph length in chars.
    pub min_paragraph_chars: usize,
    /// Minimum keyword length in chars.
    pub min_keyword_chars: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_sentence_chars: 10,
            min_paragraph_chars: 20,
            min_keyword_chars: 3,
        }
    }
}

/// Arabic-aware text analyzer: tokenization, segmentation, statistics,
/// language detection and keyword extraction.
///
/// All methods are pure over the input string; empty or whitespace-only
/// input yields empty vectors and zeroed stats, never an error.
#[derive(Debug, Clone, Default)]
pub struct TextAnalyzer {
    config: AnalyzerConfig,
    normalizer: ArabicNormalizer,
    stop_words: StopWords,
}

impl TextAnalyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with a custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the stop word set used by keyword extraction.
    pub fn with_stop_words(mut self, words: StopWords) -> Self {
        self.stop_words = words;
        self
    }

    /// Normalize text (see [`ArabicNormalizer`]).
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Normalize then split on whitespace, dropping empty tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalizer
            .normalize(text)
            .split_whitespace()
            .map(|t| t.to_string())
            .collect()
    }

    /// Number of words in the text.
    pub fn word_count(&self, text: &str) -> usize {
        self.tokenize(text).len()
    }

    /// Split raw text into sentences on terminal punctuation or newlines.
    /// Fragments shorter than the configured minimum are dropped.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.split(|c: char| SENTENCE_TERMINATORS.contains(&c))
            .map(str::trim)
            .filter(|s| s.chars().count() >= self.config.min_sentence_chars)
            .map(|s| s.to_string())
            .collect()
    }

    /// Split raw text into paragraphs on blank lines. Fragments shorter
    /// than the configured minimum are dropped.
    pub fn split_paragraphs(&self, text: &str) -> Vec<String> {
        text.split("\n\n")
            .map(str::trim)
            .filter(|p| p.chars().count() >= self.config.min_paragraph_chars)
            .map(|p| p.to_string())
            .collect()
    }

    /// Compute aggregate statistics for one text snapshot.
    pub fn compute_stats(&self, text: &str) -> TextStats {
        let tokens = self.tokenize(text);
        let sentences = self.split_sentences(text);
        let paragraphs = self.split_paragraphs(text);

        let words = tokens.len();
        let unique_words = tokens.iter().collect::<HashSet<_>>().len();

        let ratio = |num: usize, den: usize| {
            if den == 0 {
                0.0
            } else {
                num as f32 / den as f32
            }
        };

        TextStats {
            words,
            sentences: sentences.len(),
            paragraphs: paragraphs.len(),
            unique_words,
            avg_words_per_sentence: ratio(words, sentences.len()),
            avg_words_per_paragraph: ratio(words, paragraphs.len()),
            vocabulary_richness: ratio(unique_words, words),
        }
    }

    /// Detect the dominant language by the ratio of Arabic-block characters
    /// to all non-whitespace characters.
    pub fn detect_language(&self, text: &str) -> TextLanguage {
        let mut arabic = 0usize;
        let mut total = 0usize;

        for ch in text.chars() {
            if ch.is_whitespace() {
                continue;
            }
            total += 1;
            if is_arabic_char(ch) {
                arabic += 1;
            }
        }

        if total == 0 {
            return TextLanguage::Other;
        }

        let ratio = arabic as f32 / total as f32;
        if ratio > 0.7 {
            TextLanguage::Arabic
        } else if ratio > 0.3 {
            TextLanguage::Mixed
        } else {
            TextLanguage::Other
        }
    }

    /// Extract the `top_n` most frequent keywords: tokens at least the
    /// configured minimum length that are not stop words. Ties keep the
    /// original encounter order.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<KeywordFreq> {
        let mut order: Vec<String> = Vec::new();
        let mut frequencies: HashMap<String, usize> = HashMap::new();

        for token in self.tokenize(text) {
            if token.chars().count() < self.config.min_keyword_chars {
                continue;
            }
            if self.stop_words.contains(&token) {
                continue;
            }
            match frequencies.entry(token.clone()) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(1);
                    order.push(token);
                }
                std::collections::hash_map::Entry::Occupied(mut slot) => {
                    *slot.get_mut() += 1;
                }
            }
        }

        let mut keywords: Vec<KeywordFreq> = order
            .into_iter()
            .map(|word| {
                let freq = frequencies[&word];
                KeywordFreq { word, freq }
            })
            .collect();
        // Stable sort keeps encounter order within equal frequencies.
        keywords.sort_by(|a, b| b.freq.cmp(&a.freq));
        keywords.truncate(top_n);
        keywords
    }
}

/// Check if a character falls in the base Arabic Unicode block.
fn is_arabic_char(ch: char) -> bool {
    matches!(ch as u32, 0x0600..=0x06FF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_greeting() {
        let analyzer = TextAnalyzer::new();
        let tokens = analyzer.tokenize("السلام عليكم ورحمة الله وبركاته");
        assert_eq!(tokens.len(), 5);
        for token in &tokens {
            assert!(
                !token.chars().any(|c| matches!(c, '\u{064B}'..='\u{065F}')),
                "token {token} contains diacritics"
            );
        }
    }

    #[test]
    fn test_tokenize_strips_diacritics() {
        let analyzer = TextAnalyzer::new();
        let tokens = analyzer.tokenize("الكُتُبُ العَرَبِيَّةُ");
        assert_eq!(tokens, vec!["الكتب", "العربيه"]);
    }

    #[test]
    fn test_empty_input_degrades() {
        let analyzer = TextAnalyzer::new();
        assert!(analyzer.tokenize("").is_empty());
        assert!(analyzer.split_sentences("   ").is_empty());
        assert!(analyzer.split_paragraphs("\n\n\n").is_empty());

        let stats = analyzer.compute_stats("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.sentences, 0);
        assert_eq!(stats.paragraphs, 0);
        assert_eq!(stats.vocabulary_richness, 0.0);
    }

    #[test]
    fn test_split_sentences_drops_fragments() {
        let analyzer = TextAnalyzer::new();
        let text = "ذهب الولد الصغير الي المدرسه صباحا. نعم. ثم عاد الي البيت مساء؟";
        let sentences = analyzer.split_sentences(text);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_split_paragraphs() {
        let analyzer = TextAnalyzer::new();
        let text = "الفقره الاولي من النص الطويل هنا\n\nقصير\n\nالفقره الثانيه من النص الطويل هنا";
        let paragraphs = analyzer.split_paragraphs(text);
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_compute_stats_counts() {
        let analyzer = TextAnalyzer::new();
        let text = "الكتاب الجديد وصل اليوم الي المكتبه الكبيره فعلا.\n\nقرا الطالب الكتاب الجديد في المكتبه كاملا.";
        let stats = analyzer.compute_stats(text);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.sentences, 2);
        assert!(stats.words > 0);
        assert!(stats.unique_words <= stats.words);
        assert!(stats.vocabulary_richness > 0.0 && stats.vocabulary_richness <= 1.0);
    }

    #[test]
    fn test_detect_language() {
        let analyzer = TextAnalyzer::new();
        assert_eq!(
            analyzer.detect_language("النص العربي الكامل هنا"),
            TextLanguage::Arabic
        );
        assert_eq!(
            analyzer.detect_language("plain english text only"),
            TextLanguage::Other
        );
        assert_eq!(
            analyzer.detect_language("نص عربي with english معا هنا"),
            TextLanguage::Mixed
        );
        assert_eq!(analyzer.detect_language(""), TextLanguage::Other);
    }

    #[test]
    fn test_extract_keywords() {
        let analyzer = TextAnalyzer::new();
        let text = "الكتاب الجديد في المكتبه، الكتاب المفضل لدي القراء، هذا الكتاب رائع";
        let keywords = analyzer.extract_keywords(text, 3);
        assert!(!keywords.is_empty());
        assert_eq!(keywords[0].word, "الكتاب");
        assert_eq!(keywords[0].freq, 3);
        // Stop words never surface as keywords.
        assert!(keywords.iter().all(|k| k.word != "هذا" && k.word != "في"));
    }

    #[test]
    fn test_extract_keywords_tie_order() {
        let analyzer = TextAnalyzer::new();
        let keywords = analyzer.extract_keywords("نجم قمر شمس نجم قمر شمس", 10);
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["نجم", "قمر", "شمس"]);
    }
}
