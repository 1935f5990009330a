//! Extraction collaborator contract.

use crate::error::{ProcapError, Result};
use crate::memory::Fragment;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Trait for the external structured-extraction collaborator.
///
/// Given one chunk of subject-matter-expert answer text and the recent
/// interviewer questions as context, returns the partial process model
/// the chunk taught us. Implementations are typically remote LLM calls;
/// the pipeline runs them through `spawn_blocking`, so they may block.
pub trait Extractor: Send + Sync {
    /// Extracts a fragment from one chunk.
    ///
    /// Malformed or unschematized collaborator output must surface as an
    /// error; the pipeline drops the chunk's contribution after a
    /// bounded number of retries.
    fn extract(&self, chunk_text: &str, context_text: &str) -> Result<Fragment>;
}

/// Implement Extractor for Arc<T> to allow sharing across stations.
impl<T: Extractor + ?Sized> Extractor for Arc<T> {
    fn extract(&self, chunk_text: &str, context_text: &str) -> Result<Fragment> {
        (**self).extract(chunk_text, context_text)
    }
}

/// Scriptable mock extractor for testing.
///
/// Returns scripted responses in order, then empty fragments. Records
/// every call for assertions.
pub struct MockExtractor {
    script: Mutex<VecDeque<std::result::Result<Fragment, String>>>,
    calls: Mutex<Vec<(String, String)>>,
    fail_always: bool,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fail_always: false,
        }
    }

    /// Queues a fragment to return for the next unscripted call.
    pub fn with_fragment(self, fragment: Fragment) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(fragment));
        }
        self
    }

    /// Queues an extraction error.
    pub fn with_error(self, message: &str) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(message.to_string()));
        }
        self
    }

    /// Makes every call fail, ignoring the script.
    pub fn with_failure(mut self) -> Self {
        self.fail_always = true;
        self
    }

    /// Returns the `(chunk_text, context_text)` pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, chunk_text: &str, context_text: &str) -> Result<Fragment> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((chunk_text.to_string(), context_text.to_string()));
        }
        if self.fail_always {
            return Err(ProcapError::Extraction {
                message: "mock extraction failure".to_string(),
            });
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Ok(fragment)) => Ok(fragment),
            Some(Err(message)) => Err(ProcapError::Extraction { message }),
            None => Ok(Fragment::default()),
        }
    }
}
