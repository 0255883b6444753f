//! HNSW-backed nearest-neighbour index over document units.
//!
//! The index is built once at startup and is read-only afterwards: a fresh
//! [`Searcher`] is allocated per query, so [`VectorIndex::search`] takes `&self`
//! and the index can be shared behind an `Arc` by concurrent requests.
//!
//! Builds are deterministic: embeddings are requested with bounded concurrency
//! but collected in unit order, and the HNSW level generator is a
//! default-seeded `StdRng`.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use doc_loader::DocumentUnit;
use futures::{StreamExt, TryStreamExt, stream};
use hnsw::{Hnsw, Searcher};
use rand::rngs::StdRng;
use serde::Serialize;
use space::Neighbor;
use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::{EmbeddingError, IndexError, RetrievalError};
use crate::metric::{CosineDistance, similarity};
use crate::progress::Progress;

/// Lower bound for the HNSW `ef` search parameter.
const MIN_EF_SEARCH: usize = 50;

/// One retrieved unit with its cosine similarity to the query (`[0, 1]`).
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub score: f32,
    pub unit: Arc<DocumentUnit>,
}

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub indexed: usize,
    pub dimension: usize,
    pub duration_ms: u64,
}

pub struct VectorIndex {
    /// M = 16 links per node, M0 = 32 on layer 0.
    graph: Hnsw<CosineDistance, Box<[f32]>, StdRng, 16, 32>,
    /// HNSW item id -> unit.
    units: Vec<Arc<DocumentUnit>>,
    dimension: usize,
    embedding_model: String,
}

impl fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorIndex")
            .field("len", &self.units.len())
            .field("dimension", &self.dimension)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

impl VectorIndex {
    /// Embed every unit with `embedder` and insert it into a new index.
    ///
    /// An empty `units` list produces an empty index; searching it yields
    /// [`RetrievalError::EmptyIndex`].
    ///
    /// # Errors
    /// The first [`EmbeddingError`] aborts the build. All vectors must share one
    /// length: `cfg.expected_dim` if set, else the length of the first vector.
    pub async fn build(
        units: Vec<DocumentUnit>,
        embedder: &dyn EmbeddingsProvider,
        cfg: &IndexConfig,
        progress: &dyn Progress,
    ) -> Result<(Self, IndexStats), IndexError> {
        let started = Instant::now();
        let concurrency = cfg.concurrency.max(1);
        info!(
            target: "rag_index::build",
            units = units.len(),
            model = %embedder.model(),
            concurrency,
            "index build: start"
        );

        if units.is_empty() {
            warn!(target: "rag_index::build", "no units to index; every search will fail");
        }

        let vectors: Vec<Vec<f32>> = stream::iter(units.iter())
            .map(|unit| async move {
                let vector = embedder.embed(&unit.text).await;
                progress.step(&unit.id);
                vector
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        let mut dimension = cfg.expected_dim.unwrap_or(0);
        let mut graph: Hnsw<CosineDistance, Box<[f32]>, StdRng, 16, 32> =
            Hnsw::new(CosineDistance);
        let mut searcher: Searcher<u32> = Searcher::default();
        let mut stored = Vec::with_capacity(units.len());

        for (unit, vector) in units.into_iter().zip(vectors) {
            if vector.is_empty() {
                let msg = format!("empty vector for unit {}", unit.id);
                return Err(EmbeddingError::Malformed(msg).into());
            }
            if dimension == 0 {
                dimension = vector.len();
            }
            if vector.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    got: vector.len(),
                    want: dimension,
                }
                .into());
            }
            let item = graph.insert(vector.into_boxed_slice(), &mut searcher);
            debug!(target: "rag_index::build", item, unit = %unit.id, offset = unit.offset, "inserted");
            stored.push(Arc::new(unit));
        }

        let stats = IndexStats {
            indexed: stored.len(),
            dimension,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        progress.finish("index ready");
        info!(
            target: "rag_index::build",
            indexed = stats.indexed,
            dimension = stats.dimension,
            duration_ms = stats.duration_ms,
            "index build: finished"
        );

        Ok((
            Self {
                graph,
                units: stored,
                dimension,
                embedding_model: embedder.model().to_string(),
            },
            stats,
        ))
    }

    /// Up to `k` units nearest to `query`, best first.
    ///
    /// Returns `min(k, len)` hits; `k == 0` returns none.
    ///
    /// # Errors
    /// - [`RetrievalError::EmptyIndex`] if nothing was indexed
    /// - [`RetrievalError::DimensionMismatch`] if `query` has the wrong length
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        if self.units.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                got: query.len(),
                want: self.dimension,
            });
        }

        let want = k.min(self.units.len());
        if want == 0 {
            return Ok(Vec::new());
        }

        let mut neighbors = vec![
            Neighbor {
                index: !0,
                distance: !0
            };
            want
        ];
        let ef = (k * 2).max(MIN_EF_SEARCH);
        let query: Box<[f32]> = query.to_vec().into_boxed_slice();
        let mut searcher: Searcher<u32> = Searcher::default();

        let found = self.graph.nearest(&query, ef, &mut searcher, &mut neighbors);

        let hits: Vec<SearchHit> = found
            .iter()
            .filter(|n| n.index != !0)
            .filter_map(|n| {
                self.units.get(n.index).map(|unit| SearchHit {
                    score: similarity(n.distance),
                    unit: Arc::clone(unit),
                })
            })
            .collect();

        debug!(target: "rag_index::search", k, hits = hits.len(), ef, "search done");
        Ok(hits)
    }

    /// The first `k` units in document order, for callers that have no query
    /// vector. Scores are `0.0`.
    ///
    /// # Errors
    /// [`RetrievalError::EmptyIndex`] if nothing was indexed.
    pub fn leading(&self, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        if self.units.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        Ok(self
            .units
            .iter()
            .take(k)
            .map(|unit| SearchHit {
                score: 0.0,
                unit: Arc::clone(unit),
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Vector length of stored embeddings (0 for an empty, unconfigured index).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Model that produced the stored vectors.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedFuture;
    use crate::progress::NoopProgress;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VOCAB: [&str; 10] = [
        "comprehensive", "collision", "deductible", "theft", "fire", "accident", "premium",
        "claim", "glass", "rental",
    ];

    /// Bag-of-words over a fixed vocabulary, plus a constant component so no
    /// vector is all zeros.
    struct WordCounter {
        calls: AtomicUsize,
    }

    impl WordCounter {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn bag_of_words(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut v: Vec<f32> = VOCAB.iter().map(|w| lower.matches(w).count() as f32).collect();
        v.push(0.1);
        v
    }

    impl EmbeddingsProvider for WordCounter {
        fn model(&self) -> &str {
            "bag-of-words"
        }
        fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(bag_of_words(text)) })
        }
    }

    /// Returns a shorter vector for the first unit than for the rest.
    struct Ragged;

    impl EmbeddingsProvider for Ragged {
        fn model(&self) -> &str {
            "ragged"
        }
        fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
            Box::pin(async move {
                let len = if text.starts_with("Comprehensive") { 3 } else { 4 };
                Ok(vec![1.0; len])
            })
        }
    }

    struct Failing;

    impl EmbeddingsProvider for Failing {
        fn model(&self) -> &str {
            "down"
        }
        fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a> {
            Box::pin(async move {
                Err(EmbeddingError::Provider {
                    model: "down".into(),
                    message: "connection refused".into(),
                })
            })
        }
    }

    fn units() -> Vec<DocumentUnit> {
        [
            "Comprehensive insurance covers theft, fire and comprehensive glass damage.",
            "Collision insurance pays after an accident; collision claims need a report.",
            "Your deductible is paid before the insurer covers a claim. Deductible options vary.",
            "Rental reimbursement pays for a rental car while yours is repaired.",
            "Your premium depends on driving history; a premium discount may apply.",
        ]
        .iter()
        .enumerate()
        .map(|(i, t)| DocumentUnit::new("faq.txt", i * 100, *t))
        .collect()
    }

    async fn build_with(embedder: &dyn EmbeddingsProvider) -> (VectorIndex, IndexStats) {
        VectorIndex::build(units(), embedder, &IndexConfig::default(), &NoopProgress)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn build_embeds_every_unit_once() {
        let embedder = WordCounter::new();
        let (index, stats) = build_with(&embedder).await;

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 5);
        assert_eq!(index.len(), 5);
        assert_eq!(stats.indexed, 5);
        assert_eq!(stats.dimension, VOCAB.len() + 1);
        assert_eq!(index.dimension(), VOCAB.len() + 1);
        assert_eq!(index.embedding_model(), "bag-of-words");
    }

    #[tokio::test]
    async fn nearest_unit_is_returned_first() {
        let (index, _) = build_with(&WordCounter::new()).await;
        let hits = index
            .search(&bag_of_words("What does comprehensive insurance cover?"), 2)
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits[0].unit.text.starts_with("Comprehensive"));
        assert!(hits[0].score >= hits[1].score);
        assert!((0.0..=1.0).contains(&hits[0].score));
    }

    #[tokio::test]
    async fn stored_vector_finds_its_own_unit() {
        let (index, _) = build_with(&WordCounter::new()).await;
        for unit in units() {
            let hits = index.search(&bag_of_words(&unit.text), 1).unwrap();
            assert_eq!(hits[0].unit.id, unit.id);
            assert!(hits[0].score > 0.99);
        }
    }

    #[tokio::test]
    async fn builds_are_deterministic() {
        let (a, _) = build_with(&WordCounter::new()).await;
        let (b, _) = build_with(&WordCounter::new()).await;
        let q = bag_of_words("how is my premium or deductible set after a claim");

        let ids = |idx: &VectorIndex| -> Vec<String> {
            idx.search(&q, 4)
                .unwrap()
                .into_iter()
                .map(|h| h.unit.id.clone())
                .collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }

    #[tokio::test]
    async fn k_larger_than_len_returns_everything() {
        let (index, _) = build_with(&WordCounter::new()).await;
        let hits = index.search(&bag_of_words("rental"), 50).unwrap();
        assert_eq!(hits.len(), 5);
        assert!(index.search(&bag_of_words("rental"), 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_index_rejects_queries() {
        let (index, stats) =
            VectorIndex::build(Vec::new(), &WordCounter::new(), &IndexConfig::default(), &NoopProgress)
                .await
                .unwrap();
        assert!(index.is_empty());
        assert_eq!(stats.indexed, 0);
        assert_eq!(
            index.search(&bag_of_words("theft"), 4).unwrap_err(),
            RetrievalError::EmptyIndex
        );
    }

    #[tokio::test]
    async fn leading_units_follow_document_order() {
        let (index, _) = build_with(&WordCounter::new()).await;
        let offsets: Vec<usize> = index
            .leading(3)
            .unwrap()
            .iter()
            .map(|h| h.unit.offset)
            .collect();
        assert_eq!(offsets, vec![0, 100, 200]);
        assert_eq!(index.leading(50).unwrap().len(), 5);

        let (empty, _) =
            VectorIndex::build(Vec::new(), &WordCounter::new(), &IndexConfig::default(), &NoopProgress)
                .await
                .unwrap();
        assert_eq!(empty.leading(4).unwrap_err(), RetrievalError::EmptyIndex);
    }

    #[tokio::test]
    async fn query_dimension_is_checked() {
        let (index, _) = build_with(&WordCounter::new()).await;
        assert_eq!(
            index.search(&[1.0, 2.0], 4).unwrap_err(),
            RetrievalError::DimensionMismatch {
                got: 2,
                want: VOCAB.len() + 1
            }
        );
    }

    #[tokio::test]
    async fn inconsistent_vectors_abort_the_build() {
        let err = VectorIndex::build(units(), &Ragged, &IndexConfig::default(), &NoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::Embedding(EmbeddingError::DimensionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn expected_dimension_is_enforced() {
        let cfg = IndexConfig {
            expected_dim: Some(768),
            concurrency: 2,
        };
        let err = VectorIndex::build(units(), &WordCounter::new(), &cfg, &NoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::Embedding(EmbeddingError::DimensionMismatch { got: 11, want: 768 })
        ));
    }

    #[tokio::test]
    async fn provider_failure_aborts_the_build() {
        let err = VectorIndex::build(units(), &Failing, &IndexConfig::default(), &NoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::Embedding(EmbeddingError::Provider { .. })));
    }
}
