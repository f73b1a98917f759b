//! Chunk engine driven by the analysis layer as injected callbacks.

use warraq_analysis::{classify, extract_chapters, extract_page_numbers, ContentType};
use warraq_chunk::{
    chunk_text, merge_analysis, merge_text, Chunk, ChunkAnalysis, ChunkProcessor,
};
use warraq_text::TextAnalyzer;

/// Ten words per sentence, one sentence per paragraph.
const SENTENCE: &str = "كان المسافر يسير في الدرب الطويل نحو المدينه البعيده مساء";

fn large_manuscript(paragraphs: usize) -> String {
    vec![SENTENCE.to_string(); paragraphs].join("\n\n")
}

fn analyze_chunk(chunk: &Chunk) -> ChunkAnalysis<ContentType> {
    let analyzer = TextAnalyzer::new();
    let stats = analyzer.compute_stats(&chunk.text);
    ChunkAnalysis {
        words: stats.words,
        sentences: stats.sentences,
        paragraphs: stats.paragraphs,
        issues: Vec::new(),
        warnings: Vec::new(),
        chapters: extract_chapters(&chunk.text)
            .into_iter()
            .map(|m| m.text)
            .collect(),
        pages: extract_page_numbers(&chunk.text)
            .into_iter()
            .map(|m| m.number)
            .collect(),
        content_type: Some(classify(&chunk.text).content_type),
    }
}

#[test]
fn twenty_five_thousand_words_make_three_chunks() {
    let text = large_manuscript(2500); // 25,000 words
    let chunks = chunk_text(&text, 10_000);

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.words <= 13_000);
    }
    assert_eq!(merge_text(&chunks), text);
}

#[tokio::test]
async fn parallel_analysis_merges_to_document_view() {
    let text = large_manuscript(300); // 3,000 words
    let chunks = chunk_text(&text, 500);
    let chunk_count = chunks.len();
    assert!(chunk_count > 1);

    let executor = ChunkProcessor::new(4);
    let mut progress_events = 0;
    let report = executor
        .process_with_progress(
            chunks,
            |chunk| async move { Ok(analyze_chunk(&chunk)) },
            |_| progress_events += 1,
        )
        .await;

    assert_eq!(report.summary.completed, chunk_count);
    assert_eq!(report.summary.failed, 0);
    assert_eq!(progress_events, chunk_count);

    let merged = merge_analysis(&report.results);
    assert_eq!(merged.total_words, 3_000);
    assert_eq!(merged.total_paragraphs, 300);
    assert_eq!(merged.overall_type, Some(ContentType::Narrative));
    assert_eq!(merged.type_confidence, 1.0);
}

#[tokio::test]
async fn failed_chunk_is_reported_but_does_not_poison_the_merge() {
    let text = large_manuscript(100);
    let chunks = chunk_text(&text, 200);
    let chunk_count = chunks.len();

    let executor = ChunkProcessor::new(2);
    let report = executor
        .process(chunks, |chunk| async move {
            if chunk.index == 1 {
                anyhow::bail!("worker timed out");
            }
            Ok(analyze_chunk(&chunk))
        })
        .await;

    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.results.len(), chunk_count - 1);
    assert_eq!(report.failures[0].index(), 1);

    let merged = merge_analysis(&report.results);
    assert_eq!(merged.total_words, (chunk_count - 1) * 200);
}

#[tokio::test]
async fn chapter_markers_survive_chunking_with_tags() {
    // Heading paragraphs long enough to survive the paragraph-length floor.
    let body = large_manuscript(30);
    let text = format!(
        "الفصل الأول: البدايه المنتظره\n\n{body}\n\nالفصل الثاني: العوده الاخيره\n\n{body}"
    );
    let chunks = chunk_text(&text, 250);

    let executor = ChunkProcessor::default();
    let report = executor
        .process(chunks, |chunk| async move { Ok(analyze_chunk(&chunk)) })
        .await;
    let merged = merge_analysis(&report.results);

    let titles: Vec<&str> = merged
        .chapters
        .iter()
        .map(|tagged| tagged.value.as_str())
        .collect();
    assert_eq!(titles, vec!["الفصل الأول", "الفصل الثاني"]);
    assert!(merged.chapters[0].chunk <= merged.chapters[1].chunk);
}
