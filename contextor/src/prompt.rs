//! Prompt builder: the "stuff documents" layout.
//!
//! ```text
//! <instruction>
//!
//! <unit 1>
//!
//! <unit 2>
//!
//! Question: <question>
//! Helpful Answer:
//! ```

use rag_index::SearchHit;

pub const INSTRUCTION: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Build the final prompt. Hits keep their ranking order; the question is
/// inserted as given, without trimming.
///
/// # Example
/// ```
/// # use contextor::prompt::build_prompt;
/// let prompt = build_prompt("Is hail covered?", &[]);
/// assert!(prompt.ends_with("Question: Is hail covered?\nHelpful Answer:"));
/// ```
pub fn build_prompt(question: &str, hits: &[SearchHit]) -> String {
    let context = hits
        .iter()
        .map(|h| h.unit.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{INSTRUCTION}\n\n{context}\n\nQuestion: {question}\nHelpful Answer:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_loader::DocumentUnit;
    use std::sync::Arc;

    fn hit(text: &str, score: f32) -> SearchHit {
        SearchHit {
            score,
            unit: Arc::new(DocumentUnit::new("faq.txt", 0, text)),
        }
    }

    #[test]
    fn context_is_joined_in_rank_order() {
        let hits = [
            hit("Comprehensive covers theft.", 0.9),
            hit("Collision covers accidents.", 0.7),
        ];
        let prompt = build_prompt("What is covered?", &hits);

        assert!(prompt.starts_with(INSTRUCTION));
        assert!(prompt.contains(
            "\n\nComprehensive covers theft.\n\nCollision covers accidents.\n\nQuestion: What is covered?\nHelpful Answer:"
        ));
    }

    #[test]
    fn empty_question_is_kept_verbatim() {
        let prompt = build_prompt("", &[hit("Glass repair is free.", 0.5)]);
        assert!(prompt.ends_with("Question: \nHelpful Answer:"));
    }
}
