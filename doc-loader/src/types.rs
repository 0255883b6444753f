//! Document unit shape shared by the loader and the index.

use serde::{Deserialize, Serialize};

/// A contiguous span of the source text.
///
/// `offset` is the byte offset of `text` inside the source document, so
/// `&source_text[offset..offset + text.len()] == text` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUnit {
    /// Stable id derived from source, offset and text.
    pub id: String,
    /// Path (or logical name) of the document this unit came from.
    pub source: String,
    /// Byte offset of the span in the source text.
    pub offset: usize,
    /// The span itself.
    pub text: String,
}

impl DocumentUnit {
    pub fn new(source: &str, offset: usize, text: &str) -> Self {
        Self {
            id: unit_id(source, offset, text),
            source: source.to_string(),
            offset,
            text: text.to_string(),
        }
    }
}

/// First 16 hex chars of blake3(source \0 offset \0 text).
fn unit_id(source: &str, offset: usize, text: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(source.as_bytes());
    hasher.update(&[0]);
    hasher.update(offset.to_string().as_bytes());
    hasher.update(&[0]);
    hasher.update(text.as_bytes());
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_position_sensitive() {
        let a = DocumentUnit::new("faq.txt", 0, "Deductibles apply per claim.");
        let b = DocumentUnit::new("faq.txt", 0, "Deductibles apply per claim.");
        let c = DocumentUnit::new("faq.txt", 120, "Deductibles apply per claim.");
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id.len(), 16);
    }
}
