//! Manuscript analysis for Arabic text.
//!
//! Builds on `warraq-text` to provide:
//! - Structural marker extraction (chapters, pages, table of contents)
//! - Content type classification by pattern density
//! - Near-duplicate detection via token shingling
//! - Smart chapter division with natural-break heuristics
//!
//! Every function is a pure transform over a string snapshot. Degenerate
//! input (empty text, no matches) yields empty or zero-valued results,
//! never an error: "no chapters found" is a valid outcome.

pub mod chapters;
pub mod classify;
pub mod dedup;
pub mod ordinals;
pub mod structure;

pub use chapters::{divide_chapters, Chapter, ChapterMethod, DivisionConfig, DivisionResult};
pub use classify::{
    classify, classify_paragraphs, detect_irrelevant, Classification, ContentType,
    MismatchReport, ParagraphClassification,
};
pub use dedup::{
    detect_duplicate_paragraphs, detect_duplicates, detect_repeated_sentences,
    duplicate_report, remove_duplicates, DuplicateParagraph, DuplicateReport, Recommendation,
    RepeatedSentence, ShingleDuplicate, ShingleReport,
};
pub use structure::{
    extract_chapters, extract_document_structure, extract_page_numbers, extract_toc,
    quick_analyze, DocumentOverview, DocumentStructure, MarkerKind, StructuralMarker, TocEntry,
};
