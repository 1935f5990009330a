//! Capture session: the public facade over the pipeline.
//!
//! A session owns the context window, the chunk buffer, the extraction
//! worker pool and the merger, plus a background idle ticker that seals
//! stale chunks during pauses. Utterances go in through [`Session::ingest`];
//! the finished process memory comes out of [`Session::finalize`].

use crate::config::{ClassifierMode, Config};
use crate::defaults;
use crate::error::{ProcapError, Result};
use crate::llm::classifier::RoleClassifier;
use crate::llm::extractor::Extractor;
use crate::memory::schema::ProcessMemory;
use crate::stream::chunker::{ChunkBuffer, ChunkBufferConfig};
use crate::stream::classify::{classify_delegated, heuristic_classify};
use crate::stream::context::ContextWindow;
use crate::stream::extractor_station::ExtractorStation;
use crate::stream::frame::{Chunk, Role, Utterance};
use crate::stream::merger::MergerStation;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Runtime settings for one capture session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// When false, all input is answer material and no question context
    /// is gathered.
    pub interview_mode: bool,
    pub classifier: ClassifierMode,
    pub chunking: ChunkBufferConfig,
    pub context_questions: usize,
    pub max_concurrent_extractions: usize,
    pub retry_limit: u32,
    pub channel_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interview_mode: true,
            classifier: ClassifierMode::default(),
            chunking: ChunkBufferConfig::default(),
            context_questions: defaults::CONTEXT_QUESTIONS,
            max_concurrent_extractions: defaults::MAX_CONCURRENT_EXTRACTIONS,
            retry_limit: defaults::EXTRACTION_RETRY_LIMIT,
            channel_buffer: defaults::CHANNEL_BUFFER,
        }
    }
}

impl SessionConfig {
    /// Builds session settings from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            interview_mode: config.session.interview_mode,
            classifier: config.session.classifier,
            chunking: ChunkBufferConfig {
                token_target: config.chunking.token_target,
                token_max: config.chunking.token_max,
                overlap_tokens: config.chunking.overlap_tokens,
                idle_flush: Duration::from_secs(config.chunking.idle_flush_secs),
            },
            context_questions: config.chunking.context_questions,
            max_concurrent_extractions: config.extraction.max_concurrent,
            retry_limit: config.extraction.retry_limit,
            channel_buffer: config.extraction.channel_buffer,
        }
    }
}

/// A live capture session.
///
/// Cheap to share by reference across ingestion call sites; `ingest`
/// takes `&self`. Finalization consumes the session.
pub struct Session {
    interview_mode: bool,
    classifier_mode: ClassifierMode,
    delegate: Option<Arc<dyn RoleClassifier>>,
    window: Arc<Mutex<ContextWindow>>,
    buffer: Arc<Mutex<ChunkBuffer>>,
    chunk_tx: mpsc::Sender<Chunk>,
    extractor_task: JoinHandle<()>,
    merger_task: JoinHandle<ProcessMemory>,
    idle_task: JoinHandle<()>,
}

impl Session {
    /// Starts a session with the heuristic classifier only.
    pub fn start(config: SessionConfig, extractor: Arc<dyn Extractor>) -> Self {
        Self::build(config, extractor, None)
    }

    /// Starts a session with a delegated classifier available.
    pub fn start_with_classifier(
        config: SessionConfig,
        extractor: Arc<dyn Extractor>,
        classifier: Arc<dyn RoleClassifier>,
    ) -> Self {
        Self::build(config, extractor, Some(classifier))
    }

    fn build(
        config: SessionConfig,
        extractor: Arc<dyn Extractor>,
        delegate: Option<Arc<dyn RoleClassifier>>,
    ) -> Self {
        let (chunk_tx, chunk_rx) = mpsc::channel(config.channel_buffer);
        let (outcome_tx, outcome_rx) = mpsc::channel(config.channel_buffer);

        let station = ExtractorStation::new(extractor).with_retry_limit(config.retry_limit);
        let extractor_task = tokio::spawn(station.run(
            chunk_rx,
            outcome_tx,
            config.max_concurrent_extractions,
        ));
        let merger_task = tokio::spawn(MergerStation::new().run(outcome_rx));

        let window = Arc::new(Mutex::new(ContextWindow::new(config.context_questions)));
        let buffer = Arc::new(Mutex::new(ChunkBuffer::with_config(config.chunking.clone())));

        let idle_task = tokio::spawn(idle_ticker(
            buffer.clone(),
            window.clone(),
            chunk_tx.clone(),
            config.chunking.idle_flush,
        ));

        Self {
            interview_mode: config.interview_mode,
            classifier_mode: config.classifier,
            delegate,
            window,
            buffer,
            chunk_tx,
            extractor_task,
            merger_task,
            idle_task,
        }
    }

    /// Feeds one utterance into the session.
    ///
    /// Questions update the context window; answers go to the chunk
    /// buffer, which may seal and dispatch chunks. Backpressure from a
    /// full extraction queue is applied here.
    pub async fn ingest(&self, utterance: Utterance) -> Result<()> {
        let role = self.resolve_role(&utterance).await;

        if role == Role::Question {
            self.window.lock().await.push(&utterance.text);
            return Ok(());
        }

        let context = self.window.lock().await.snapshot();
        let sealed = {
            let mut buffer = self.buffer.lock().await;
            buffer.push(&utterance, &context)
        };
        for chunk in sealed {
            self.chunk_tx
                .send(chunk)
                .await
                .map_err(|_| ProcapError::ChannelClosed {
                    station: "extractor",
                })?;
        }
        Ok(())
    }

    async fn resolve_role(&self, utterance: &Utterance) -> Role {
        if !self.interview_mode {
            return Role::Answer;
        }
        match utterance.role {
            Role::Question => Role::Question,
            Role::Answer => Role::Answer,
            Role::Unknown => match (&self.classifier_mode, &self.delegate) {
                (ClassifierMode::Delegated, Some(delegate)) => {
                    classify_delegated(delegate.clone(), utterance.text.clone()).await
                }
                _ => heuristic_classify(&utterance.text),
            },
        }
    }

    /// Ends the session: force-flushes the buffer, drains the pipeline,
    /// and returns the accumulated process memory.
    pub async fn finalize(self) -> Result<ProcessMemory> {
        let Session {
            window,
            buffer,
            chunk_tx,
            extractor_task,
            merger_task,
            idle_task,
            ..
        } = self;

        // Stop the ticker first so its sender clone is gone before the
        // channel is expected to close.
        idle_task.abort();
        let _ = idle_task.await;

        let context = window.lock().await.snapshot();
        let leftover = buffer.lock().await.force_flush(&context);
        if let Some(chunk) = leftover {
            chunk_tx
                .send(chunk)
                .await
                .map_err(|_| ProcapError::ChannelClosed {
                    station: "extractor",
                })?;
        }
        drop(chunk_tx);

        extractor_task.await.map_err(|e| ProcapError::Shutdown {
            message: format!("extractor station failed: {e}"),
        })?;
        merger_task.await.map_err(|e| ProcapError::Shutdown {
            message: format!("merger station failed: {e}"),
        })
    }
}

/// Periodically seals a buffer that has gone quiet.
async fn idle_ticker(
    buffer: Arc<Mutex<ChunkBuffer>>,
    window: Arc<Mutex<ContextWindow>>,
    chunk_tx: mpsc::Sender<Chunk>,
    idle_flush: Duration,
) {
    let period = (idle_flush / 4).max(Duration::from_millis(25));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let sealed = {
            let context = window.lock().await.snapshot();
            let mut buffer = buffer.lock().await;
            buffer.flush_if_idle(&context)
        };
        if let Some(chunk) = sealed {
            if chunk_tx.send(chunk).await.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::classifier::MockRoleClassifier;
    use crate::llm::extractor::MockExtractor;
    use crate::memory::Fragment;

    fn tiny_config() -> SessionConfig {
        SessionConfig {
            chunking: ChunkBufferConfig {
                token_target: 12,
                token_max: 20,
                overlap_tokens: 3,
                idle_flush: Duration::from_millis(60),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_session_yields_empty_memory() {
        let session = Session::start(tiny_config(), Arc::new(MockExtractor::new()));
        let memory = session.finalize().await.unwrap();
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_question_goes_to_context_not_buffer() {
        let extractor = Arc::new(MockExtractor::new());
        let session = Session::start(tiny_config(), extractor.clone());

        session
            .ingest(Utterance::new("Who owns the process?"))
            .await
            .unwrap();
        let memory = session.finalize().await.unwrap();

        // Nothing buffered, nothing extracted.
        assert!(memory.is_empty());
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_finalize_force_flushes_partial_buffer() {
        let extractor = Arc::new(MockExtractor::new().with_fragment(Fragment {
            owner: Some("Sarah Johnson".to_string()),
            ..Default::default()
        }));
        let session = Session::start(tiny_config(), extractor.clone());

        session
            .ingest(Utterance::new("Sarah Johnson owns the process."))
            .await
            .unwrap();
        let memory = session.finalize().await.unwrap();

        assert_eq!(extractor.call_count(), 1);
        assert_eq!(memory.owner.as_deref(), Some("Sarah Johnson"));
    }

    #[tokio::test]
    async fn test_interview_mode_off_treats_questions_as_answers() {
        let extractor = Arc::new(MockExtractor::new());
        let config = SessionConfig {
            interview_mode: false,
            ..tiny_config()
        };
        let session = Session::start(config, extractor.clone());

        session
            .ingest(Utterance::new("Who owns the process?"))
            .await
            .unwrap();
        session.finalize().await.unwrap();

        // The question was chunked and extracted as answer material.
        assert_eq!(extractor.call_count(), 1);
        assert!(extractor.calls()[0].0.contains("Who owns the process?"));
    }

    #[tokio::test]
    async fn test_delegated_classifier_routes_questions() {
        let extractor = Arc::new(MockExtractor::new());
        let config = SessionConfig {
            classifier: ClassifierMode::Delegated,
            ..tiny_config()
        };
        let session = Session::start_with_classifier(
            config,
            extractor.clone(),
            Arc::new(MockRoleClassifier::new(Role::Question)),
        );

        session
            .ingest(Utterance::new("the handoff step"))
            .await
            .unwrap();
        session.finalize().await.unwrap();

        // Classified as a question despite no lexical cue.
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_preassigned_role_bypasses_classification() {
        let extractor = Arc::new(MockExtractor::new());
        let session = Session::start(tiny_config(), extractor.clone());

        // Looks like a question, but the host already labeled it.
        session
            .ingest(Utterance::with_role(
                "What a mess that step was.",
                Role::Answer,
            ))
            .await
            .unwrap();
        session.finalize().await.unwrap();

        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_idle_ticker_seals_quiet_buffer() {
        let extractor = Arc::new(MockExtractor::new());
        let session = Session::start(tiny_config(), extractor.clone());

        session
            .ingest(Utterance::new("The intake team reviews the form."))
            .await
            .unwrap();

        // Well past the 60ms idle window; the ticker should have sealed.
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(extractor.call_count(), 1);
        session.finalize().await.unwrap();
    }

    #[tokio::test]
    async fn test_context_attached_to_extraction() {
        let extractor = Arc::new(MockExtractor::new());
        let session = Session::start(tiny_config(), extractor.clone());

        session
            .ingest(Utterance::new("What starts the process?"))
            .await
            .unwrap();
        session
            .ingest(Utterance::new(
                "It starts when a customer submits an application.",
            ))
            .await
            .unwrap();
        session.finalize().await.unwrap();

        let calls = extractor.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.contains("What starts the process?"));
    }
}
