//! Near-duplicate detection.
//!
//! Token shingling with a polynomial rolling hash, paragraph fingerprints,
//! repeated-sentence counting and a similarity-threshold dedup transform.
//! Hash collisions are accepted as negligible noise, not eliminated.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use warraq_text::TextAnalyzer;

/// Default shingle window, in tokens.
pub const DEFAULT_WINDOW: usize = 5;
/// Default Jaccard similarity threshold for `remove_duplicates`.
pub const DEFAULT_SIMILARITY: f32 = 0.8;

const PARAGRAPH_FINGERPRINT_TOKENS: usize = 20;
const DEDUP_FINGERPRINT_TOKENS: usize = 15;
/// Paragraphs under this many tokens are always kept by the dedup pass.
const MIN_DEDUP_TOKENS: usize = 10;

/// Shingle repetition rate above which a manuscript is flagged as highly
/// repetitive, in percent. Tunable heuristics.
const HIGH_REPETITION_RATE: f32 = 20.0;
const MODERATE_REPETITION_RATE: f32 = 10.0;

/// A repeated shingle occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShingleDuplicate {
    /// Token index of this occurrence.
    pub position: usize,
    /// Token index of the first (canonical) occurrence.
    pub first_position: usize,
    pub text: String,
}

/// Shingle-level repetition summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShingleReport {
    pub duplicates: Vec<ShingleDuplicate>,
    /// Percentage of shingles that repeat an earlier one, in [0, 100].
    pub repetition_rate: f32,
    pub unique_shingles: usize,
    pub total_shingles: usize,
}

/// A paragraph whose fingerprint matches an earlier paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateParagraph {
    pub index: usize,
    pub duplicate_of: usize,
    pub preview: String,
}

/// A sentence appearing more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedSentence {
    /// Normalized token form of the sentence.
    pub text: String,
    pub count: usize,
}

/// Overall verdict for the repetition report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Acceptable,
    ModerateRepetition,
    HighRepetition,
}

/// Consolidated repetition report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub shingles: ShingleReport,
    pub duplicate_paragraphs: Vec<DuplicateParagraph>,
    pub repeated_sentences: Vec<RepeatedSentence>,
    pub recommendation: Recommendation,
    pub has_issues: bool,
}

/// Find repeated token windows.
///
/// A `window_size` larger than the token count degrades to an empty
/// report; zero is treated as one.
pub fn detect_duplicates(text: &str, window_size: usize) -> ShingleReport {
    let analyzer = TextAnalyzer::new();
    let tokens = analyzer.tokenize(text);
    let window = window_size.max(1);
    if tokens.len() < window {
        return ShingleReport::default();
    }

    let total = tokens.len() - window + 1;
    let mut first_seen: HashMap<u64, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for position in 0..total {
        let shingle = &tokens[position..position + window];
        match first_seen.entry(shingle_hash(shingle)) {
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
            Entry::Occupied(slot) => duplicates.push(ShingleDuplicate {
                position,
                first_position: *slot.get(),
                text: shingle.join(" "),
            }),
        }
    }

    ShingleReport {
        repetition_rate: duplicates.len() as f32 / total as f32 * 100.0,
        unique_shingles: first_seen.len(),
        total_shingles: total,
        duplicates,
    }
}

/// Find paragraphs repeating an earlier paragraph, by exact match of a
/// fingerprint over the first 20 tokens.
pub fn detect_duplicate_paragraphs(text: &str) -> Vec<DuplicateParagraph> {
    let analyzer = TextAnalyzer::new();
    let mut first_seen: HashMap<u64, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for (index, paragraph) in analyzer.split_paragraphs(text).iter().enumerate() {
        let tokens = analyzer.tokenize(paragraph);
        let head = &tokens[..tokens.len().min(PARAGRAPH_FINGERPRINT_TOKENS)];
        match first_seen.entry(shingle_hash(head)) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            Entry::Occupied(slot) => duplicates.push(DuplicateParagraph {
                index,
                duplicate_of: *slot.get(),
                preview: paragraph.chars().take(100).collect(),
            }),
        }
    }

    duplicates
}

/// Count sentences that repeat at least `min_repetitions` times, sorted
/// descending by count.
pub fn detect_repeated_sentences(text: &str, min_repetitions: usize) -> Vec<RepeatedSentence> {
    let analyzer = TextAnalyzer::new();
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for sentence in analyzer.split_sentences(text) {
        let key = analyzer.tokenize(&sentence).join(" ");
        if key.is_empty() {
            continue;
        }
        match counts.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(1);
                order.push(key);
            }
            Entry::Occupied(mut slot) => *slot.get_mut() += 1,
        }
    }

    let mut repeated: Vec<RepeatedSentence> = order
        .into_iter()
        .filter_map(|text| {
            let count = counts[&text];
            (count >= min_repetitions.max(2)).then_some(RepeatedSentence { text, count })
        })
        .collect();
    repeated.sort_by(|a, b| b.count.cmp(&a.count));
    repeated
}

/// Greedy order-preserving paragraph dedup.
///
/// Each paragraph's 15-token fingerprint is compared by Jaccard similarity
/// against every retained fingerprint; the paragraph is dropped when any
/// comparison exceeds `threshold`. Paragraphs under 10 tokens are always
/// kept and never registered.
pub fn remove_duplicates(text: &str, threshold: f32) -> String {
    let analyzer = TextAnalyzer::new();
    let mut retained: Vec<String> = Vec::new();
    let mut fingerprints: Vec<HashSet<String>> = Vec::new();

    for paragraph in analyzer.split_paragraphs(text) {
        let tokens = analyzer.tokenize(&paragraph);
        if tokens.len() < MIN_DEDUP_TOKENS {
            retained.push(paragraph);
            continue;
        }

        let fingerprint: HashSet<String> = tokens
            .into_iter()
            .take(DEDUP_FINGERPRINT_TOKENS)
            .collect();
        let duplicate = fingerprints
            .iter()
            .any(|seen| jaccard(seen, &fingerprint) > threshold);

        if !duplicate {
            retained.push(paragraph);
            fingerprints.push(fingerprint);
        }
    }

    retained.join("\n\n")
}

/// Compose shingle, paragraph and sentence analyses into one report.
pub fn duplicate_report(text: &str) -> DuplicateReport {
    let shingles = detect_duplicates(text, DEFAULT_WINDOW);
    let duplicate_paragraphs = detect_duplicate_paragraphs(text);
    let repeated_sentences = detect_repeated_sentences(text, 2);

    let recommendation = if shingles.repetition_rate > HIGH_REPETITION_RATE {
        Recommendation::HighRepetition
    } else if shingles.repetition_rate > MODERATE_REPETITION_RATE {
        Recommendation::ModerateRepetition
    } else {
        Recommendation::Acceptable
    };
    let has_issues =
        recommendation != Recommendation::Acceptable || !duplicate_paragraphs.is_empty();

    DuplicateReport {
        shingles,
        duplicate_paragraphs,
        repeated_sentences,
        recommendation,
        has_issues,
    }
}

/// Polynomial rolling hash over the characters of a token window.
fn shingle_hash(tokens: &[String]) -> u64 {
    let mut hash: u64 = 0;
    for token in tokens {
        for ch in token.chars() {
            hash = hash.wrapping_mul(31).wrapping_add(ch as u64);
        }
        hash = hash.wrapping_mul(31).wrapping_add(' ' as u64);
    }
    hash
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}
