//! Streaming pipeline.
//!
//! Stations connected by bounded channels: classification routes
//! utterances, the chunk buffer seals bounded chunks, the extraction
//! pool turns chunks into fragments, and the merger folds fragments into
//! the process memory in seal order. [`session::Session`] wires it all
//! together.

pub mod chunker;
pub mod classify;
pub mod clock;
pub mod context;
pub mod extractor_station;
pub mod frame;
pub mod merger;
pub mod session;

pub use chunker::{ChunkBuffer, ChunkBufferConfig, approx_tokens};
pub use classify::heuristic_classify;
pub use clock::{Clock, MockClock, SystemClock};
pub use context::ContextWindow;
pub use extractor_station::ExtractorStation;
pub use frame::{Chunk, CloseReason, ExtractionOutcome, Role, Utterance};
pub use merger::MergerStation;
pub use session::{Session, SessionConfig};
