//! Merging per-chunk analysis results.
//!
//! The vote key is generic so the caller's content-type enum plugs in
//! without this crate depending on the analysis layer; any `Eq + Hash +
//! Clone` key works.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::chunker::Chunk;

/// A value tagged with the index of the chunk that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tagged<T> {
    pub chunk: usize,
    pub value: T,
}

/// Analysis payload one chunk contributes to the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkAnalysis<K> {
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    /// Chapter heading texts found in the chunk.
    pub chapters: Vec<String>,
    /// Page numbers found in the chunk.
    pub pages: Vec<u32>,
    /// Chunk-level content classification vote.
    pub content_type: Option<K>,
}

/// Document-level view assembled from per-chunk analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedAnalysis<K> {
    pub total_words: usize,
    pub total_sentences: usize,
    pub total_paragraphs: usize,
    pub issues: Vec<Tagged<String>>,
    pub warnings: Vec<Tagged<String>>,
    pub chapters: Vec<Tagged<String>>,
    pub pages: Vec<Tagged<u32>>,
    /// Majority vote among chunk-level classifications.
    pub overall_type: Option<K>,
    /// Vote share of the winning type, in [0, 1].
    pub type_confidence: f32,
}

/// Merge per-chunk analyses in chunk index order.
///
/// Totals are summed; issues, warnings, chapters and pages are
/// concatenated with their source chunk index; the overall type is the
/// majority vote (ties keep the earliest-voted type).
pub fn merge_analysis<K>(results: &[ChunkAnalysis<K>]) -> MergedAnalysis<K>
where
    K: Eq + Hash + Clone,
{
    let mut merged = MergedAnalysis {
        total_words: 0,
        total_sentences: 0,
        total_paragraphs: 0,
        issues: Vec::new(),
        warnings: Vec::new(),
        chapters: Vec::new(),
        pages: Vec::new(),
        overall_type: None,
        type_confidence: 0.0,
    };

    let mut votes: HashMap<K, usize> = HashMap::new();
    let mut vote_order: Vec<K> = Vec::new();
    let mut vote_total = 0;

    for (chunk, result) in results.iter().enumerate() {
        merged.total_words += result.words;
        merged.total_sentences += result.sentences;
        merged.total_paragraphs += result.paragraphs;

        let tag = |values: &[String]| -> Vec<Tagged<String>> {
            values
                .iter()
                .map(|value| Tagged {
                    chunk,
                    value: value.clone(),
                })
                .collect()
        };
        merged.issues.extend(tag(&result.issues));
        merged.warnings.extend(tag(&result.warnings));
        merged.chapters.extend(tag(&result.chapters));
        merged
            .pages
            .extend(result.pages.iter().map(|page| Tagged {
                chunk,
                value: *page,
            }));

        if let Some(vote) = &result.content_type {
            vote_total += 1;
            let count = votes.entry(vote.clone()).or_insert(0);
            if *count == 0 {
                vote_order.push(vote.clone());
            }
            *count += 1;
        }
    }

    // Strictly-greater scan in first-vote order: ties keep the earliest.
    let mut winner: Option<(&K, usize)> = None;
    for key in &vote_order {
        let count = votes[key];
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((key, count));
        }
    }
    if let Some((key, count)) = winner {
        merged.type_confidence = count as f32 / vote_total as f32;
        merged.overall_type = Some(key.clone());
    }

    merged
}

/// Join chunk texts with blank-line separators in index order.
pub fn merge_text(chunks: &[Chunk]) -> String {
    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_by_key(|chunk| chunk.index);
    ordered
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
