//! Configurable stop words for keyword extraction.

use std::collections::HashSet;

/// Default Arabic stop words.
pub static DEFAULT_ARABIC_STOP_WORDS: &[&str] = &[
    // Particles and prepositions
    "من", "في", "علي", "الي", "عن", "مع", "بين", "حتي", "منذ",
    // Conjunctions
    "او", "ثم", "لكن", "بل", "اما", "لو", "لولا",
    // Pronouns
    "هو", "هي", "هم", "هن", "انا", "نحن", "انت", "انتم",
    // Demonstratives
    "هذا", "هذه", "ذلك", "تلك", "هؤلاء", "اولئك",
    // Relative pronouns
    "الذي", "التي", "الذين", "اللواتي",
    // Question words
    "ماذا", "اين", "متي", "كيف", "لماذا",
    // Auxiliary verbs
    "كان", "يكون", "كانت", "كانوا", "ليس", "ليست",
    // Common particles
    "قد", "لقد", "سوف", "لن", "لم", "لا", "ان", "اذا",
    // Common words
    "كل", "بعض", "غير", "عند", "ذات", "هناك", "هنا",
    "فقط", "ايضا", "جدا", "بعد", "قبل", "خلال", "حول",
];

/// Set-backed stop word collection.
///
/// The default list is stored in normalized form (see
/// [`ArabicNormalizer`](crate::ArabicNormalizer)) so membership checks work
/// on normalized tokens.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::arabic()
    }
}

impl StopWords {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Create from a slice of words.
    pub fn from_slice(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create with the default Arabic stop words.
    pub fn arabic() -> Self {
        Self::from_slice(DEFAULT_ARABIC_STOP_WORDS)
    }

    /// Add a word.
    pub fn add(&mut self, word: impl Into<String>) {
        self.words.insert(word.into());
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: &StopWords) {
        for word in &other.words {
            self.words.insert(word.clone());
        }
    }

    /// Check membership.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
