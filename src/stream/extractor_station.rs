//! Extraction station: bounded-concurrency worker pool.
//!
//! Receives sealed chunks, runs the extraction collaborator on the
//! blocking pool with a bounded number of in-flight calls, and emits one
//! outcome per chunk. Completion order is arbitrary; the merger restores
//! seal order downstream. A chunk that keeps failing past the retry
//! budget still emits a FAILED outcome so the ordering gate can advance.

use crate::defaults;
use crate::llm::extractor::Extractor;
use crate::stream::frame::{Chunk, ExtractionOutcome};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};

/// Station that extracts process-model fragments from sealed chunks.
pub struct ExtractorStation {
    extractor: Arc<dyn Extractor>,
    retry_limit: u32,
}

impl ExtractorStation {
    /// Creates a station with the default retry budget.
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            retry_limit: defaults::EXTRACTION_RETRY_LIMIT,
        }
    }

    /// Overrides the number of retries after the initial attempt.
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Runs the station until the input channel closes and all in-flight
    /// extractions have drained.
    pub async fn run(
        self,
        mut input: mpsc::Receiver<Chunk>,
        output: mpsc::Sender<ExtractionOutcome>,
        max_concurrent: usize,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        while let Some(chunk) = input.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // semaphore closed, shutting down
            };

            let extractor = self.extractor.clone();
            let output = output.clone();
            let retry_limit = self.retry_limit;

            tokio::spawn(async move {
                let _permit = permit;
                let outcome = extract_with_retries(extractor, &chunk, retry_limit).await;
                // Receiver gone means the session is tearing down.
                let _ = output.send(outcome).await;
            });
        }

        // Wait for in-flight extractions before the output sender drops.
        let _ = semaphore.acquire_many(max_concurrent as u32).await;
    }
}

async fn extract_with_retries(
    extractor: Arc<dyn Extractor>,
    chunk: &Chunk,
    retry_limit: u32,
) -> ExtractionOutcome {
    let seq = chunk.seq;
    let text = chunk.answer_text.clone();
    let context = chunk.context_text();

    for attempt in 0..=retry_limit {
        let extractor = extractor.clone();
        let text = text.clone();
        let context = context.clone();

        let result =
            tokio::task::spawn_blocking(move || extractor.extract(&text, &context)).await;

        match result {
            Ok(Ok(fragment)) => return ExtractionOutcome::Extracted { seq, fragment },
            Ok(Err(e)) => {
                eprintln!(
                    "procap: extraction attempt {} failed for chunk {seq}: {e}",
                    attempt + 1
                );
            }
            Err(e) => {
                eprintln!(
                    "procap: extraction task panicked on attempt {} for chunk {seq}: {e}",
                    attempt + 1
                );
            }
        }
    }

    eprintln!("procap: dropping chunk {seq} after {} attempts", retry_limit + 1);
    ExtractionOutcome::Failed { seq }
}
