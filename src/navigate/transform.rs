//! Transform: shapes a ranked candidate list into a token-budgeted result
//! envelope, greedily packing highest-score elements first and falling back
//! to an LLM summary for an over-budget element worth keeping.

use crate::adapter::LlmAdapter;
use crate::graph::Element;

use super::types::{ChunkStrategy, Transform, TransformFormat};

const IMPORTANCE_SUMMARY_THRESHOLD: f64 = 0.5;
/// Normalizes unbounded scores arriving from `apply_tilt` (degree count,
/// keyword hit count, `n - idx` temporal rank, ...) to the `[0, 1]`
/// importance range §4.10 calls for, relative to the batch's own max.
fn normalize_importance(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|s| (s / max).clamp(0.0, 1.0)).collect()
}
/// Crude chars-per-token estimate, the same ballpark ratio the teacher's
/// prompt-budgeting code assumes for English text.
const CHARS_PER_TOKEN: usize = 4;

#[derive(Debug, Clone)]
pub struct ResultChunk {
    pub element_label: String,
    pub text: String,
    pub estimated_tokens: usize,
    pub summarized: bool,
}

#[derive(Debug, Clone)]
pub struct TransformedResult {
    pub chunks: Vec<ResultChunk>,
    pub format: TransformFormat,
    pub total_tokens: usize,
    /// True if the candidate list had elements that didn't fit the budget
    /// even after summarization and were dropped.
    pub truncated: bool,
}

fn estimate_tokens(text: &str) -> usize {
    (text.len() / CHARS_PER_TOKEN).max(1)
}

fn chunk_text(text: &str, strategy: ChunkStrategy, token_budget: usize) -> Vec<String> {
    let char_budget = token_budget * CHARS_PER_TOKEN;
    match strategy {
        ChunkStrategy::Fixed => text
            .as_bytes()
            .chunks(char_budget.max(1))
            .map(|b| String::from_utf8_lossy(b).to_string())
            .collect(),
        ChunkStrategy::Semantic => text
            .split("\n\n")
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        ChunkStrategy::Adaptive => {
            if text.len() <= char_budget {
                vec![text.to_string()]
            } else {
                text.split(". ").map(|s| format!("{s}.")).collect()
            }
        }
        ChunkStrategy::TokenAware => {
            let words: Vec<&str> = text.split_whitespace().collect();
            let words_per_chunk = (token_budget).max(1);
            words
                .chunks(words_per_chunk)
                .map(|w| w.join(" "))
                .collect()
        }
    }
}

/// Greedily packs `candidates` (already ranked, highest priority first)
/// into `transform.max_tokens`. An element whose content alone overflows
/// the remaining budget is summarized via `llm` if its importance score
/// (the selector's final score, normalized to `[0, 1]`) exceeds
/// `IMPORTANCE_SUMMARY_THRESHOLD`, otherwise it's dropped and `truncated`
/// is set.
pub async fn transform_result(
    candidates: Vec<(Element, f64)>,
    transform: &Transform,
    llm: &dyn LlmAdapter,
) -> TransformedResult {
    let raw_scores: Vec<f64> = candidates.iter().map(|(_, score)| *score).collect();
    let importance = normalize_importance(&raw_scores);

    let mut chunks = Vec::new();
    let mut used_tokens = 0;
    let mut truncated = false;

    for ((element, _), importance) in candidates.into_iter().zip(importance) {
        let text = element.content.clone().unwrap_or_else(|| element.label.clone());
        let remaining = transform.max_tokens.saturating_sub(used_tokens);
        if remaining == 0 {
            truncated = true;
            continue;
        }

        let tokens = estimate_tokens(&text);
        if tokens <= remaining {
            used_tokens += tokens;
            chunks.push(ResultChunk {
                element_label: element.label.clone(),
                text,
                estimated_tokens: tokens,
                summarized: false,
            });
            continue;
        }

        if importance > IMPORTANCE_SUMMARY_THRESHOLD {
            let prompt = format!("Summarize the following in under {remaining} tokens:\n{text}");
            if let Ok(summary) = llm.complete(&prompt).await {
                let summary_tokens = estimate_tokens(&summary).min(remaining);
                used_tokens += summary_tokens;
                chunks.push(ResultChunk {
                    element_label: element.label.clone(),
                    text: summary,
                    estimated_tokens: summary_tokens,
                    summarized: true,
                });
                continue;
            }
        }
        truncated = true;
    }

    // Chunk strategy is applied per already-accepted element for callers
    // that want sub-element granularity (e.g. streaming a long unit back in
    // pieces); it doesn't change which elements made the cut above.
    let chunks = chunks
        .into_iter()
        .flat_map(|chunk| {
            let pieces = chunk_text(&chunk.text, transform.chunk_strategy, transform.max_tokens);
            if pieces.len() <= 1 {
                vec![chunk]
            } else {
                pieces
                    .into_iter()
                    .map(|piece| ResultChunk {
                        element_label: chunk.element_label.clone(),
                        estimated_tokens: estimate_tokens(&piece),
                        text: piece,
                        summarized: chunk.summarized,
                    })
                    .collect()
            }
        })
        .collect();

    TransformedResult {
        chunks,
        format: transform.format,
        total_tokens: used_tokens,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockLlmAdapter;
    use crate::graph::{ElementId, ElementKind};

    fn element(label: &str, content: &str) -> Element {
        Element::new(ElementKind::Unit, label, ElementId::from("c1")).with_content(content)
    }

    #[tokio::test]
    async fn packs_elements_until_budget_exhausted() {
        let transform = Transform {
            max_tokens: 10,
            ..Default::default()
        };
        let candidates = vec![
            (element("a", &"x".repeat(20)), 0.9),
            (element("b", &"y".repeat(20)), 0.1),
        ];
        let result = transform_result(candidates, &transform, &MockLlmAdapter::new()).await;
        assert!(result.total_tokens <= 10 || result.chunks.iter().any(|c| c.summarized));
    }

    #[tokio::test]
    async fn low_importance_overflow_is_dropped_not_summarized() {
        // Importance is normalized relative to the batch, so this needs a
        // companion high-score candidate to give "low" any meaning; "a"
        // fits the budget outright and anchors the batch max, leaving "b"
        // normalized well under the summary threshold.
        let transform = Transform {
            max_tokens: 30,
            ..Default::default()
        };
        let candidates = vec![
            (element("a", "short"), 1.0),
            (element("b", &"y".repeat(200)), 0.05),
        ];
        let result = transform_result(candidates, &transform, &MockLlmAdapter::new()).await;
        assert!(result.truncated);
        assert!(result.chunks.iter().all(|c| c.element_label != "b"));
    }

    #[tokio::test]
    async fn high_importance_overflow_is_summarized() {
        let transform = Transform {
            max_tokens: 5,
            ..Default::default()
        };
        let candidates = vec![(element("a", &"x".repeat(100)), 0.9)];
        let result = transform_result(candidates, &transform, &MockLlmAdapter::with_response("short")).await;
        assert!(result.chunks.iter().any(|c| c.summarized));
    }
}
