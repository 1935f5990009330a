//! Chunk buffer: the core scheduler.
//!
//! Accumulates answer text into bounded chunks and seals them when:
//! - Admitting an utterance would cross the hard token ceiling (MAX)
//! - The token target is reached on a sentence boundary (SIZE)
//! - No utterance arrives within the idle window (IDLE)
//! - The session ends (FORCE)
//!
//! Each sealed chunk leaves a small overlap tail that seeds the next
//! chunk, preserving facts that straddle a seam. Sealing only happens on
//! utterance boundaries, never mid-word.

use crate::defaults;
use crate::stream::clock::{Clock, SystemClock};
use crate::stream::frame::{Chunk, CloseReason, Utterance};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Rough token count: three quarters of the whitespace word count, the
/// usual English words-to-tokens rule of thumb.
pub fn approx_tokens(text: &str) -> usize {
    text.split_whitespace().count() * 3 / 4
}

/// The trailing `count`-token slice of `text`, rejoined with single
/// spaces. Deterministic: identical input always yields identical bytes.
pub fn trailing_tokens(text: &str, count: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(count);
    words[start..].join(" ")
}

/// Whether an utterance ends on a natural breakpoint.
pub fn ends_sentence(text: &str) -> bool {
    matches!(
        text.trim_end().chars().last(),
        Some('.') | Some('!') | Some('?') | Some('…')
    )
}

/// Configuration for the chunk buffer.
#[derive(Debug, Clone)]
pub struct ChunkBufferConfig {
    /// Token estimate at which a sentence boundary seals the chunk.
    pub token_target: usize,
    /// Hard token ceiling; never crossed except by a single oversized
    /// utterance.
    pub token_max: usize,
    /// Tokens carried from a sealed chunk into the next.
    pub overlap_tokens: usize,
    /// Ingestion silence before a non-empty buffer seals.
    pub idle_flush: Duration,
}

impl Default for ChunkBufferConfig {
    fn default() -> Self {
        Self {
            token_target: defaults::CHUNK_TOKEN_TARGET,
            token_max: defaults::CHUNK_TOKEN_MAX,
            overlap_tokens: defaults::CHUNK_OVERLAP_TOKENS,
            idle_flush: Duration::from_secs(defaults::IDLE_FLUSH_SECS),
        }
    }
}

/// Buffer that accumulates answer utterances and emits sealed chunks.
///
/// State machine per session: EMPTY → FILLING → SEALED → EMPTY. The
/// caller serializes access; check-and-seal is one synchronous step.
pub struct ChunkBuffer {
    config: ChunkBufferConfig,
    clock: Arc<dyn Clock>,
    /// Buffered utterance texts of the filling chunk.
    parts: Vec<String>,
    /// Total whitespace words across `parts`.
    words: usize,
    /// Overlap tail awaiting the next chunk's first utterance.
    overlap: Option<String>,
    /// When the filling chunk received its first utterance.
    opened_at: Option<Instant>,
    /// Last append, for the idle trigger.
    last_activity: Option<Instant>,
    /// Next seal-order sequence number.
    next_seq: u64,
}

impl ChunkBuffer {
    /// Creates a buffer with default configuration.
    pub fn new() -> Self {
        Self::with_config(ChunkBufferConfig::default())
    }

    /// Creates a buffer with custom configuration.
    pub fn with_config(config: ChunkBufferConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            parts: Vec::new(),
            words: 0,
            overlap: None,
            opened_at: None,
            last_activity: None,
            next_seq: 0,
        }
    }

    /// Replaces the clock (for deterministic testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns true when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Current token estimate of the filling chunk.
    pub fn token_estimate(&self) -> usize {
        self.words * 3 / 4
    }

    /// Appends an ANSWER utterance, sealing as needed.
    ///
    /// Usually returns no chunk or one; an utterance that both closes
    /// the previous chunk and alone exceeds the ceiling yields two.
    pub fn push(&mut self, utterance: &Utterance, context: &[String]) -> Vec<Chunk> {
        let text = utterance.text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let incoming = text.split_whitespace().count();
        let mut sealed = Vec::new();

        // Admitting this utterance would cross the ceiling: seal what we
        // have first so the chunk stays within budget.
        if !self.parts.is_empty() && (self.words + incoming) * 3 / 4 >= self.config.token_max {
            sealed.push(self.seal(CloseReason::Max, context));
        }

        self.append(text, incoming);

        if self.token_estimate() >= self.config.token_max {
            // A single utterance (plus any overlap seed) past the
            // ceiling: sealed as-is, documented edge case.
            sealed.push(self.seal(CloseReason::Max, context));
        } else if self.token_estimate() >= self.config.token_target && ends_sentence(text) {
            sealed.push(self.seal(CloseReason::Size, context));
        }

        sealed
    }

    /// Seals a non-empty buffer that has been idle past the flush
    /// window. Driven by a timer independent of the ingestion path.
    pub fn flush_if_idle(&mut self, context: &[String]) -> Option<Chunk> {
        let last = self.last_activity?;
        if !self.parts.is_empty() && self.clock.now().duration_since(last) >= self.config.idle_flush
        {
            return Some(self.seal(CloseReason::Idle, context));
        }
        None
    }

    /// Seals whatever is buffered at session end. Leaves no overlap
    /// tail behind.
    pub fn force_flush(&mut self, context: &[String]) -> Option<Chunk> {
        if self.parts.is_empty() {
            return None;
        }
        Some(self.seal(CloseReason::Force, context))
    }

    fn append(&mut self, text: &str, word_count: usize) {
        let now = self.clock.now();
        if self.parts.is_empty() {
            self.opened_at = Some(now);
            if let Some(tail) = self.overlap.take() {
                self.words += tail.split_whitespace().count();
                self.parts.push(tail);
            }
        }
        self.parts.push(text.to_string());
        self.words += word_count;
        self.last_activity = Some(now);
    }

    fn seal(&mut self, reason: CloseReason, context: &[String]) -> Chunk {
        let answer_text = self.parts.join(" ");
        let token_estimate = self.token_estimate();
        let opened_at = self.opened_at.take().unwrap_or_else(|| self.clock.now());

        if reason != CloseReason::Force {
            let tail = trailing_tokens(&answer_text, self.config.overlap_tokens);
            if !tail.is_empty() {
                self.overlap = Some(tail);
            }
        }

        self.parts.clear();
        self.words = 0;
        self.last_activity = None;

        let seq = self.next_seq;
        self.next_seq += 1;

        Chunk {
            seq,
            answer_text,
            context: context.to_vec(),
            token_estimate,
            opened_at,
            closed_reason: reason,
        }
    }
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        Self::new()
    }
}
