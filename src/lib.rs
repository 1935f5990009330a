//! procap — streaming capture of process knowledge from interviews.
//!
//! Turns a live stream of interview utterances into a structured process
//! model. Interviewer questions become extraction context; expert
//! answers accumulate into bounded chunks that an external collaborator
//! turns into partial fragments, merged deterministically in seal order.
//!
//! The crate is a library only: hosts supply the transport to their LLM
//! by implementing [`llm::Extractor`] (and optionally
//! [`llm::RoleClassifier`]) and drive a [`stream::Session`].

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod llm;
pub mod memory;
pub mod source;
pub mod stream;

pub use config::{ClassifierMode, Config};
pub use error::{ProcapError, Result};
pub use llm::{Extractor, MockExtractor, MockRoleClassifier, RoleClassifier};
pub use memory::{Fragment, ProcessMemory};
pub use stream::{
    Chunk, ChunkBuffer, ChunkBufferConfig, CloseReason, Role, Session, SessionConfig, Utterance,
};
