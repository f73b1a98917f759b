//! Structural marker extraction.
//!
//! Regex/heuristic detection of chapter headings, page numbers, table of
//! contents blocks and generic document structure. Heuristic false
//! positives (a stray bracketed number read as a page marker, a short line
//! read as a header) are accepted precision/recall trade-offs, not errors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use warraq_text::TextAnalyzer;

use crate::ordinals::{ordinal_to_number, parse_digits, ORDINAL_WORDS};

/// Page numbers at or above this value are treated as false positives.
const MAX_PLAUSIBLE_PAGE: u32 = 10_000;

/// Kind of structural marker found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Chapter,
    Page,
}

/// A structural marker: a chapter heading or a page number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralMarker {
    pub kind: MarkerKind,
    pub number: u32,
    /// Byte offset of the match in the source text.
    pub position: usize,
    pub text: String,
    /// 1-based line number.
    pub line: usize,
}

/// One row of a detected table of contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    pub page: u32,
    /// Indentation level, two spaces per level.
    pub level: usize,
}

/// A header line and its level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderLine {
    pub line: usize,
    pub text: String,
    pub level: usize,
}

/// A paragraph-weight line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphLine {
    pub line: usize,
    pub text: String,
    pub words: usize,
}

/// A list, quote or code line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkedLine {
    pub line: usize,
    pub text: String,
}

/// Flat decomposition of one document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    pub headers: Vec<HeaderLine>,
    pub paragraphs: Vec<ParagraphLine>,
    pub lists: Vec<MarkedLine>,
    pub quotes: Vec<MarkedLine>,
    pub code_blocks: Vec<MarkedLine>,
}

/// Convenience aggregate over all extractors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOverview {
    pub chapters: Vec<StructuralMarker>,
    pub pages: Vec<StructuralMarker>,
    pub toc: Option<Vec<TocEntry>>,
    pub structure: DocumentStructure,
    pub has_chapters: bool,
    pub has_page_numbers: bool,
    pub has_toc: bool,
}

/// Chapter heading patterns: Arabic ordinal words or digits after a
/// section word, and the Latin "Chapter N" form.
static CHAPTER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    // Longest alternatives first so "الثاني عشر" wins over "الثاني".
    let mut ordinals: Vec<String> = ORDINAL_WORDS
        .iter()
        .flat_map(|w| [regex::escape(w), regex::escape(&w.replace('أ', "ا"))])
        .collect();
    ordinals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    ordinals.dedup();
    let alt = ordinals.join("|");

    vec![
        Regex::new(&format!(r"(?:الفصل|الباب|القسم|الجزء)\s+({alt})")).unwrap(),
        Regex::new(r"(?:الفصل|الباب|القسم|الجزء)\s+([0-9٠-٩]+)").unwrap(),
        Regex::new(r"(?i)\bChapter\s+([0-9]+)").unwrap(),
    ]
});

/// Page marker patterns: "صفحة N" / "ص N", bracketed "[N]", and a bare
/// number alone on a line.
static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b(?:صفحة|ص)\s*[.:]?\s*([0-9٠-٩]+)").unwrap(),
        Regex::new(r"\[([0-9٠-٩]+)\]").unwrap(),
        Regex::new(r"(?m)^[ \t]*([0-9٠-٩]{1,5})[ \t]*$").unwrap(),
    ]
});

/// Phrases that open a table of contents block.
static TOC_TRIGGERS: &[&str] = &[
    "جدول المحتويات",
    "فهرس المحتويات",
    "المحتويات",
    "الفهرس",
    "Table of Contents",
];

/// A TOC row: title, dot-or-ellipsis run, page number.
static TOC_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( *)(.+?) *[.…]{2,} *([0-9٠-٩]+) *$").unwrap());

static MD_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-*•●]|[0-9٠-٩]+\.)\s+").unwrap());

/// Extract chapter heading markers, sorted ascending by position.
pub fn extract_chapters(text: &str) -> Vec<StructuralMarker> {
    let mut markers = Vec::new();

    for pattern in CHAPTER_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let whole = caps.get(0).expect("match group 0");
            let group = caps.get(1).expect("capture group 1").as_str();
            let number = match ordinal_to_number(group).or_else(|| parse_digits(group)) {
                Some(n) => n,
                None => continue,
            };
            markers.push(StructuralMarker {
                kind: MarkerKind::Chapter,
                number,
                position: whole.start(),
                text: whole.as_str().trim().to_string(),
                line: line_of(text, whole.start()),
            });
        }
    }

    markers.sort_by_key(|m| m.position);
    markers.dedup_by_key(|m| m.position);
    markers
}

/// Extract page number markers, sorted ascending by page number value.
pub fn extract_page_numbers(text: &str) -> Vec<StructuralMarker> {
    let mut markers = Vec::new();

    for pattern in PAGE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let whole = caps.get(0).expect("match group 0");
            let Some(number) = parse_digits(caps.get(1).expect("capture group 1").as_str())
            else {
                continue;
            };
            if number >= MAX_PLAUSIBLE_PAGE {
                continue;
            }
            markers.push(StructuralMarker {
                kind: MarkerKind::Page,
                number,
                position: whole.start(),
                text: whole.as_str().trim().to_string(),
                line: line_of(text, whole.start()),
            });
        }
    }

    markers.sort_by_key(|m| (m.number, m.position));
    markers.dedup_by_key(|m| m.position);
    markers
}

/// Locate and parse a table of contents block.
///
/// Scans up to 50 lines after the first trigger phrase; a line over 100
/// chars, or (after 20 lines) a line without any digit, ends the block.
/// Returns `None` when no row matches.
pub fn extract_toc(text: &str) -> Option<Vec<TocEntry>> {
    let trigger_pos = TOC_TRIGGERS
        .iter()
        .filter_map(|t| text.find(t))
        .min()?;

    let after_trigger = &text[trigger_pos..];
    let mut entries = Vec::new();

    for (scanned, line) in after_trigger.lines().skip(1).take(50).enumerate() {
        if line.chars().count() > 100 {
            break;
        }
        if scanned >= 20 && !line.chars().any(|c| c.is_ascii_digit() || ('٠'..='٩').contains(&c))
        {
            break;
        }
        if let Some(caps) = TOC_ROW.captures(line) {
            let indent = caps.get(1).map_or(0, |m| m.as_str().len());
            let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            if let Some(page) = parse_digits(caps.get(3).map_or("", |m| m.as_str())) {
                entries.push(TocEntry {
                    title,
                    page,
                    level: indent / 2,
                });
            }
        }
    }

    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Decompose a document into headers, paragraphs, lists, quotes and code
/// blocks in a single line pass.
///
/// Header and paragraph predicates are independent: a short header-weight
/// line longer than 50 chars is counted in both buckets.
pub fn extract_document_structure(text: &str) -> DocumentStructure {
    let analyzer = TextAnalyzer::new();
    let mut structure = DocumentStructure::default();
    let mut in_code = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();

        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            structure.code_blocks.push(MarkedLine {
                line: line_no,
                text: raw.to_string(),
            });
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = MD_HEADER.captures(trimmed) {
            structure.headers.push(HeaderLine {
                line: line_no,
                text: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                level: caps.get(1).map_or(1, |m| m.as_str().len()),
            });
        } else if is_alternative_header(trimmed) {
            structure.headers.push(HeaderLine {
                line: line_no,
                text: trimmed.to_string(),
                level: 1,
            });
        }

        if LIST_ITEM.is_match(raw) {
            structure.lists.push(MarkedLine {
                line: line_no,
                text: trimmed.to_string(),
            });
        }

        if trimmed.starts_with('>')
            || trimmed.starts_with('«')
            || trimmed.starts_with('"')
            || trimmed.starts_with('\u{201C}')
        {
            structure.quotes.push(MarkedLine {
                line: line_no,
                text: trimmed.to_string(),
            });
        }

        if trimmed.chars().count() > 50 {
            structure.paragraphs.push(ParagraphLine {
                line: line_no,
                text: trimmed.to_string(),
                words: analyzer.word_count(trimmed),
            });
        }
    }

    structure
}

/// Run every extractor and aggregate the findings.
pub fn quick_analyze(text: &str) -> DocumentOverview {
    let chapters = extract_chapters(text);
    let pages = extract_page_numbers(text);
    let toc = extract_toc(text);
    let structure = extract_document_structure(text);

    DocumentOverview {
        has_chapters: !chapters.is_empty(),
        has_page_numbers: !pages.is_empty(),
        has_toc: toc.is_some(),
        chapters,
        pages,
        toc,
        structure,
    }
}

/// Short capitalized/Arabic-initial line without terminal punctuation.
fn is_alternative_header(trimmed: &str) -> bool {
    let len = trimmed.chars().count();
    if !(5..=80).contains(&len) {
        return false;
    }
    if trimmed
        .chars()
        .next_back()
        .is_some_and(|c| matches!(c, '.' | '!' | '؟' | '?' | '،' | ':' | '؛' | ','))
    {
        return false;
    }
    trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || matches!(c as u32, 0x0600..=0x06FF))
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, position: usize) -> usize {
    text[..position].bytes().filter(|b| *b == b'\n').count() + 1
}
