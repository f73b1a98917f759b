//! Content type classification.
//!
//! Scores a text span against five content-type heuristics using pattern
//! density over the token count. Patterns are written against normalized
//! text (see `warraq-text`), one form per word.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use warraq_text::TextAnalyzer;

/// Density→confidence scaling. A tunable heuristic constant, not a
/// calibrated probability.
const CONFIDENCE_SCALE: f32 = 10.0;

/// Code density above this flags code fragments embedded in prose even
/// when the top-1 classification says otherwise.
const EMBEDDED_CODE_DENSITY: f32 = 0.3;

/// Confidence a mismatched classification must reach before a span is
/// flagged as irrelevant.
const MISMATCH_CONFIDENCE: f32 = 0.6;

/// Closed set of content types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Narrative,
    Dialogue,
    Description,
    Code,
    Academic,
    Unknown,
}

/// Classification of one text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub content_type: ContentType,
    /// Clamped to [0, 1].
    pub confidence: f32,
    /// Pattern density per content type.
    pub scores: BTreeMap<ContentType, f32>,
    /// Raw match count per pattern family.
    pub features: BTreeMap<String, usize>,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            content_type: ContentType::Unknown,
            confidence: 0.0,
            scores: BTreeMap::new(),
            features: BTreeMap::new(),
        }
    }
}

/// Classification of a single paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphClassification {
    pub index: usize,
    /// First 100 chars of the paragraph.
    pub preview: String,
    pub classification: Classification,
}

/// Outcome of checking a span against an expected content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchReport {
    pub is_irrelevant: bool,
    pub reason: Option<String>,
    pub confidence: Option<f32>,
}

struct PatternGroup {
    content_type: ContentType,
    patterns: Vec<(&'static str, Regex)>,
}

fn group(content_type: ContentType, families: &[(&'static str, &str)]) -> PatternGroup {
    PatternGroup {
        content_type,
        patterns: families
            .iter()
            .map(|(label, pattern)| (*label, Regex::new(pattern).unwrap()))
            .collect(),
    }
}

/// Pattern families per content type, matched against normalized text.
static PATTERN_GROUPS: Lazy<Vec<PatternGroup>> = Lazy::new(|| {
    vec![
        group(
            ContentType::Narrative,
            &[
                (
                    "state_verbs",
                    r"\b(كان|كانت|اصبح|اصبحت|صار|ذهب|ذهبت|جاء|جاءت|عاد|عادت|وصل|وصلت|خرج|دخل)\b",
                ),
                (
                    "time_markers",
                    r"\b(يوم|ليله|صباح|مساء|عندما|حين|بينما|فجاه|بعدها|حينها)\b",
                ),
                ("pronouns", r"\b(هو|هي|هم|هن)\b"),
            ],
        ),
        group(
            ContentType::Dialogue,
            &[
                ("quote_glyphs", "[\"«»\u{201C}\u{201D}\u{2018}\u{2019}]"),
                (
                    "speech_verbs",
                    r"\b(قال|قالت|اجاب|اجابت|سال|سالت|صرخ|صرخت|همس|همست)\b",
                ),
                ("terminal_marks", r"[!؟]"),
            ],
        ),
        group(
            ContentType::Description,
            &[
                (
                    "adjectives",
                    r"\b(جميل|جميله|كبير|كبيره|صغير|صغيره|طويل|طويله|قصير|قصيره|واسع|واسعه|عميق|عميقه)\b",
                ),
                (
                    "colors",
                    r"\b(احمر|ازرق|اخضر|اصفر|ابيض|اسود|رمادي|ذهبي|فضي)\b",
                ),
                (
                    "sensory",
                    r"\b(رائحه|صوت|لون|ملمس|طعم|ضوء|ظل|نسيم|عطر)\b",
                ),
            ],
        ),
        group(
            ContentType::Code,
            &[
                (
                    "keywords",
                    r"\b(function|const|let|var|return|if|else|for|while|class|import|export|def|fn|use)\b",
                ),
                ("punctuation", r"[{}();]"),
                ("operators", r"(=>|==|!=|<=|>=|&&|\|\|)"),
            ],
        ),
        group(
            ContentType::Academic,
            &[
                ("citations", r"\[[0-9]+\]|\([0-9]{4}\)"),
                (
                    "concluding",
                    r"(وبالتالي|نستنتج|الخلاصه|اذن|في الختام|مما سبق)",
                ),
                (
                    "connectors",
                    r"(علاوه علي ذلك|بالاضافه الي|من ناحيه اخري|وفقا|بناء علي)",
                ),
            ],
        ),
    ]
});

/// Classify a text span by pattern density.
///
/// Deterministic: identical input always yields identical scores, type and
/// confidence. Zero tokens → `Unknown` with zero confidence.
pub fn classify(text: &str) -> Classification {
    let analyzer = TextAnalyzer::new();
    let normalized = analyzer.normalize(text);
    let token_count = normalized.split_whitespace().count();
    if token_count == 0 {
        return Classification::unknown();
    }

    let mut scores = BTreeMap::new();
    let mut features = BTreeMap::new();
    let mut top = (ContentType::Unknown, 0.0f32);

    for group in PATTERN_GROUPS.iter() {
        let mut matches = 0usize;
        for (label, pattern) in &group.patterns {
            let count = pattern.find_iter(&normalized).count();
            matches += count;
            features.insert((*label).to_string(), count);
        }
        let density = matches as f32 / token_count as f32;
        scores.insert(group.content_type, density);
        // Strictly-greater keeps table order on ties.
        if density > top.1 {
            top = (group.content_type, density);
        }
    }

    Classification {
        content_type: top.0,
        confidence: (top.1 * CONFIDENCE_SCALE).min(1.0),
        scores,
        features,
    }
}

/// Classify each paragraph longer than 50 chars independently. No
/// cross-paragraph smoothing.
pub fn classify_paragraphs(text: &str) -> Vec<ParagraphClassification> {
    let analyzer = TextAnalyzer::new();
    let paragraphs = analyzer.split_paragraphs(text);

    paragraphs
        .par_iter()
        .enumerate()
        .filter(|(_, p)| p.chars().count() > 50)
        .map(|(index, paragraph)| ParagraphClassification {
            index,
            preview: preview_of(paragraph),
            classification: classify(paragraph),
        })
        .collect()
}

/// Flag a span whose classification does not match the expected type.
pub fn detect_irrelevant(text: &str, expected: ContentType) -> MismatchReport {
    let classification = classify(text);
    let code_density = classification
        .scores
        .get(&ContentType::Code)
        .copied()
        .unwrap_or(0.0);

    if classification.content_type != expected
        && classification.confidence > MISMATCH_CONFIDENCE
    {
        return MismatchReport {
            is_irrelevant: true,
            reason: Some(format!(
                "expected {:?}, classified as {:?}",
                expected, classification.content_type
            )),
            confidence: Some(classification.confidence),
        };
    }

    // Code fragments buried in prose can lose the top-1 vote to other
    // dominant signals; the density valve catches them anyway.
    if expected == ContentType::Narrative && code_density > EMBEDDED_CODE_DENSITY {
        return MismatchReport {
            is_irrelevant: true,
            reason: Some("code content embedded in narrative text".to_string()),
            confidence: Some((code_density * CONFIDENCE_SCALE).min(1.0)),
        };
    }

    MismatchReport {
        is_irrelevant: false,
        reason: None,
        confidence: None,
    }
}

fn preview_of(paragraph: &str) -> String {
    let mut preview: String = paragraph.chars().take(100).collect();
    if paragraph.chars().count() > 100 {
        preview.push_str("...");
    }
    preview
}
