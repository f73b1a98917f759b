//! Paragraph-respecting text chunking.

use serde::{Deserialize, Serialize};

use warraq_text::TextAnalyzer;

/// A chunk of manuscript text.
///
/// Chunks never split or reorder paragraphs: joining chunk texts with a
/// blank line in index order reconstructs the source paragraph sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub words: usize,
    pub paragraphs: usize,
}

/// Split text into chunks bounded by a soft word budget.
///
/// The budget check happens before a paragraph is added, so a chunk may
/// close under budget but never mid-paragraph. A single paragraph larger
/// than the budget becomes its own oversized chunk. `max_words = 0`
/// degrades to a single chunk.
pub fn chunk_text(text: &str, max_words: usize) -> Vec<Chunk> {
    let analyzer = TextAnalyzer::new();
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut words = 0;

    fn flush(current: &mut Vec<String>, words: &mut usize, chunks: &mut Vec<Chunk>) {
        if current.is_empty() {
            return;
        }
        chunks.push(Chunk {
            index: chunks.len(),
            text: current.join("\n\n"),
            words: *words,
            paragraphs: current.len(),
        });
        current.clear();
        *words = 0;
    }

    for paragraph in analyzer.split_paragraphs(text) {
        let paragraph_words = analyzer.word_count(&paragraph);
        if !current.is_empty() && max_words > 0 && words + paragraph_words > max_words {
            flush(&mut current, &mut words, &mut chunks);
        }
        words += paragraph_words;
        current.push(paragraph);
    }
    flush(&mut current, &mut words, &mut chunks);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "سار المسافر في الدرب الطويل نحو المدينه البعيده قبل الغروب";

    fn manuscript(paragraphs: usize) -> String {
        vec![SENTENCE.to_string(); paragraphs].join("\n\n")
    }

    #[test]
    fn respects_word_budget() {
        let text = manuscript(25); // 25 paragraphs of 10 words
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].words, 100);
        assert_eq!(chunks[1].words, 100);
        assert_eq!(chunks[2].words, 50);
        assert_eq!(chunks[0].paragraphs, 10);
    }

    #[test]
    fn reconstructs_paragraph_sequence() {
        let text = manuscript(25);
        for budget in [1, 10, 35, 100, 1000] {
            let chunks = chunk_text(&text, budget);
            let joined: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            assert_eq!(joined.join("\n\n"), text, "budget {budget}");
            for (k, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, k);
            }
        }
    }

    #[test]
    fn oversized_paragraph_stays_whole() {
        let big = vec![SENTENCE; 5].join(" "); // one 50-word paragraph
        let text = format!("{SENTENCE}\n\n{big}\n\n{SENTENCE}");
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].words, 50);
        assert_eq!(chunks[1].paragraphs, 1);
    }

    #[test]
    fn zero_budget_yields_single_chunk() {
        let text = manuscript(5);
        let chunks = chunk_text(&text, 0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].words, 50);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("\n\n\n", 100).is_empty());
    }
}
