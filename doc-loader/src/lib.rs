//! Public API:
//! - [`load_document`]: read one file and split it into [`DocumentUnit`]s.
//! - [`split_text`]: the chunking step on its own, for text already in memory.

pub mod chunking;
pub mod config;
pub mod errors;
mod loader;
pub mod types;

pub use chunking::split_text;
pub use config::{ChunkMode, LoaderConfig};
pub use errors::LoadError;
pub use loader::load_document;
pub use types::DocumentUnit;
