//! Arabic manuscript text primitives.
//!
//! Provides the tokenization layer every other analysis crate builds on:
//! - Diacritics (tashkeel) and tatweel removal
//! - Character normalization (alef, yaa, taa marbuta)
//! - Word/sentence/paragraph segmentation
//! - Document statistics and language detection
//! - Stop-word-aware keyword extraction

mod analyzer;
mod normalize;
mod stop_words;

pub use analyzer::{AnalyzerConfig, KeywordFreq, TextAnalyzer, TextLanguage, TextStats};
pub use normalize::ArabicNormalizer;
pub use stop_words::{StopWords, DEFAULT_ARABIC_STOP_WORDS};
