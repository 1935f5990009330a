//! Default tuning constants for procap.
//!
//! Shared between the TOML configuration layer and the per-component
//! config structs so both stay in sync.

/// Token estimate at which a filling chunk prefers to seal on the next
/// sentence boundary.
///
/// 800 tokens keeps extraction prompts comfortably inside typical LLM
/// context budgets while carrying enough narrative for the extractor to
/// resolve pronouns and step ordering.
pub const CHUNK_TOKEN_TARGET: usize = 800;

/// Hard token ceiling for a chunk.
///
/// A buffer never admits an utterance that would push it past this limit;
/// it seals first. The single exception is one utterance that alone
/// exceeds the ceiling, which is sealed as-is.
pub const CHUNK_TOKEN_MAX: usize = 1100;

/// Number of trailing tokens carried from a sealed chunk into the next.
///
/// The overlap is the only device preserving facts that straddle a chunk
/// seam, at the cost of re-extracting a small tail of text.
pub const CHUNK_OVERLAP_TOKENS: usize = 120;

/// Seconds of ingestion silence before a non-empty buffer is sealed.
///
/// Bounds worst-case latency between a spoken fact and its appearance in
/// the process memory when the speaker pauses.
pub const IDLE_FLUSH_SECS: u64 = 20;

/// Capacity of the recent-questions context window.
///
/// Recent interviewer questions are attached to each chunk as extraction
/// context only; they are never extracted as content.
pub const CONTEXT_QUESTIONS: usize = 3;

/// Maximum number of extraction calls in flight at once.
pub const MAX_CONCURRENT_EXTRACTIONS: usize = 2;

/// Additional extraction attempts after the first failure.
///
/// Past this budget the chunk's contribution is dropped and the session
/// moves on; forward progress beats completeness.
pub const EXTRACTION_RETRY_LIMIT: u32 = 2;

/// Buffer size of the channels between pipeline stations.
pub const CHANNEL_BUFFER: usize = 100;
