//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// A context unit that was fed to the LLM.
#[derive(Clone, Debug, Serialize)]
pub struct UsedChunk {
    pub score: f32,
    pub source: String,
    pub offset: usize,
    pub text: String,
}

/// Final answer together with the exact context passed to the model.
///
/// # Example
/// ```
/// use contextor::{QaAnswer, UsedChunk};
/// let qa = QaAnswer {
///     answer: "Theft, fire and hail damage.".into(),
///     context: vec![UsedChunk {
///         score: 0.91,
///         source: "data/insurance_faq.txt".into(),
///         offset: 0,
///         text: "Comprehensive insurance covers...".into(),
///     }],
/// };
/// assert!(!qa.answer.is_empty());
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<UsedChunk>,
}
