//! Retrieval-augmented answering over a prebuilt [`rag_index::VectorIndex`].
//!
//! Public API: [`Responder::answer`]. It embeds the question, retrieves the
//! top-K units, stuffs them into a single prompt, calls the language model once
//! and returns the completion verbatim.

mod api_types;
mod cfg;
mod error;
mod llm;
pub mod prompt;
mod responder;
mod retrieve;

pub use api_types::{QaAnswer, UsedChunk};
pub use cfg::ResponderConfig;
pub use error::{ContextorError, GenerationError};
pub use llm::{GenerateFuture, TextGenerator};
pub use responder::Responder;
pub use retrieve::retrieve;
