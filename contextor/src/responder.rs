use std::sync::Arc;
use std::time::Instant;

use rag_index::{EmbeddingsProvider, VectorIndex};
use tracing::{info, instrument, warn};

use crate::api_types::{QaAnswer, UsedChunk};
use crate::cfg::ResponderConfig;
use crate::error::{ContextorError, GenerationError};
use crate::llm::TextGenerator;
use crate::prompt::build_prompt;
use crate::retrieve::retrieve;

/// Answers questions from a fixed index. Shared read-only across requests.
pub struct Responder {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    generator: Arc<dyn TextGenerator>,
    cfg: ResponderConfig,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("index", &self.index)
            .field("embedding_model", &self.embedder.model())
            .field("generation_model", &self.generator.model())
            .field("cfg", &self.cfg)
            .finish()
    }
}

impl Responder {
    /// # Errors
    /// [`ContextorError::ModelMismatch`] when `embedder` is not the model the
    /// index was built with, [`ContextorError::InvalidConfig`] for `top_k == 0`.
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        generator: Arc<dyn TextGenerator>,
        cfg: ResponderConfig,
    ) -> Result<Self, ContextorError> {
        if embedder.model() != index.embedding_model() {
            return Err(ContextorError::ModelMismatch {
                index: index.embedding_model().to_string(),
                query: embedder.model().to_string(),
            });
        }
        if cfg.top_k == 0 {
            return Err(ContextorError::InvalidConfig("top_k must be > 0".into()));
        }
        if index.is_empty() {
            warn!(
                target: "contextor::answer",
                "responder created over an empty index; every question will fail"
            );
        }
        Ok(Self {
            index,
            embedder,
            generator,
            cfg,
        })
    }

    /// Embed `question`, retrieve the top-K units and ask the model once.
    ///
    /// The question is used exactly as given, including the empty string.
    ///
    /// # Errors
    /// - [`ContextorError::Retrieval`] for an empty index
    /// - [`ContextorError::Embedding`] if the question cannot be embedded
    /// - [`ContextorError::Generation`] on model failure or timeout
    #[instrument(skip_all, fields(question_chars = question.len(), top_k = self.cfg.top_k))]
    pub async fn answer(&self, question: &str) -> Result<QaAnswer, ContextorError> {
        let started = Instant::now();

        let hits = retrieve(&self.index, self.embedder.as_ref(), question, self.cfg.top_k).await?;
        let prompt = build_prompt(question, &hits);

        let call = self.generator.generate(&prompt);
        let answer = match self.cfg.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GenerationError::Timeout(limit))??,
            None => call.await?,
        };

        info!(
            target: "contextor::answer",
            context_units = hits.len(),
            prompt_chars = prompt.len(),
            answer_chars = answer.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "answered"
        );

        let context = hits
            .into_iter()
            .map(|h| UsedChunk {
                score: h.score,
                source: h.unit.source.clone(),
                offset: h.unit.offset,
                text: h.unit.text.clone(),
            })
            .collect();

        Ok(QaAnswer { answer, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerateFuture;
    use doc_loader::DocumentUnit;
    use rag_index::{EmbedFuture, IndexConfig, NoopProgress, RetrievalError};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const VOCAB: [&str; 6] = ["comprehensive", "collision", "deductible", "theft", "glass", "rental"];

    struct Words(&'static str);

    impl EmbeddingsProvider for Words {
        fn model(&self) -> &str {
            self.0
        }
        fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
            if text.is_empty() {
                return Box::pin(async { Ok(Vec::new()) });
            }
            let lower = text.to_lowercase();
            let mut v: Vec<f32> = VOCAB.iter().map(|w| lower.matches(w).count() as f32).collect();
            v.push(0.1);
            Box::pin(async move { Ok(v) })
        }
    }

    /// Records every prompt and answers with a canned string.
    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<String>>,
    }

    impl TextGenerator for Recorder {
        fn model(&self) -> &str {
            "recorder"
        }
        fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
            Box::pin(async move {
                if let Ok(mut p) = self.prompts.lock() {
                    p.push(prompt.to_string());
                }
                Ok("It covers theft, fire and glass damage.".to_string())
            })
        }
    }

    struct Slow;

    impl TextGenerator for Slow {
        fn model(&self) -> &str {
            "slow"
        }
        fn generate<'a>(&'a self, _prompt: &'a str) -> GenerateFuture<'a> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("late".to_string())
            })
        }
    }

    struct Broken(AtomicUsize);

    impl TextGenerator for Broken {
        fn model(&self) -> &str {
            "broken"
        }
        fn generate<'a>(&'a self, _prompt: &'a str) -> GenerateFuture<'a> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Err(GenerationError::Provider {
                    model: "broken".into(),
                    message: "HTTP 500".into(),
                })
            })
        }
    }

    fn faq() -> Vec<DocumentUnit> {
        [
            "Comprehensive insurance covers theft, fire and glass damage.",
            "Collision insurance covers accidents with other vehicles.",
            "A deductible is what you pay before the insurer pays.",
            "Rental reimbursement covers a rental car during repairs.",
            "Roadside assistance covers towing.",
        ]
        .iter()
        .enumerate()
        .map(|(i, t)| DocumentUnit::new("faq.txt", i * 80, *t))
        .collect()
    }

    async fn index_of(units: Vec<DocumentUnit>) -> Arc<VectorIndex> {
        let (index, _) = VectorIndex::build(units, &Words("words"), &IndexConfig::default(), &NoopProgress)
            .await
            .unwrap();
        Arc::new(index)
    }

    async fn responder(generator: Arc<dyn TextGenerator>, cfg: ResponderConfig) -> Responder {
        Responder::new(index_of(faq()).await, Arc::new(Words("words")), generator, cfg).unwrap()
    }

    #[tokio::test]
    async fn answers_with_retrieved_context() {
        let generator = Arc::new(Recorder::default());
        let r = responder(generator.clone(), ResponderConfig::default()).await;

        let qa = r.answer("What is covered under comprehensive insurance?").await.unwrap();
        assert_eq!(qa.answer, "It covers theft, fire and glass damage.");
        assert_eq!(qa.context.len(), 4);
        assert!(qa.context[0].text.starts_with("Comprehensive"));

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("theft, fire and glass damage"));
        assert!(prompts[0].ends_with(
            "Question: What is covered under comprehensive insurance?\nHelpful Answer:"
        ));
    }

    #[tokio::test]
    async fn empty_question_is_forwarded() {
        let generator = Arc::new(Recorder::default());
        let r = responder(generator.clone(), ResponderConfig::default()).await;

        let qa = r.answer("").await.unwrap();
        assert!(!qa.answer.is_empty());
        assert_eq!(qa.context.len(), 4);
        assert!(qa.context[0].text.starts_with("Comprehensive"));
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].ends_with("Question: \nHelpful Answer:"));
    }

    #[tokio::test]
    async fn empty_index_fails_without_calling_the_model() {
        let generator = Arc::new(Broken(AtomicUsize::new(0)));
        let r = Responder::new(
            index_of(Vec::new()).await,
            Arc::new(Words("words")),
            generator.clone(),
            ResponderConfig::default(),
        )
        .unwrap();

        let err = r.answer("Is hail covered?").await.unwrap_err();
        assert!(matches!(err, ContextorError::Retrieval(RetrievalError::EmptyIndex)));
        assert_eq!(generator.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_mismatch_is_rejected() {
        let err = Responder::new(
            index_of(faq()).await,
            Arc::new(Words("other-model")),
            Arc::new(Recorder::default()),
            ResponderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ContextorError::ModelMismatch { .. }));
    }

    #[tokio::test]
    async fn generation_failure_is_reported() {
        let r = responder(Arc::new(Broken(AtomicUsize::new(0))), ResponderConfig::default()).await;
        let err = r.answer("Is glass covered?").await.unwrap_err();
        assert!(matches!(err, ContextorError::Generation(GenerationError::Provider { .. })));
    }

    #[tokio::test]
    async fn slow_generation_times_out() {
        let cfg = ResponderConfig {
            top_k: 2,
            generation_timeout: Some(Duration::from_millis(50)),
        };
        let r = responder(Arc::new(Slow), cfg).await;
        let err = r.answer("Is theft covered?").await.unwrap_err();
        assert!(matches!(
            err,
            ContextorError::Generation(GenerationError::Timeout(d)) if d == Duration::from_millis(50)
        ));
    }
}
