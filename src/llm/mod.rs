//! Contracts for the external LLM collaborators.
//!
//! The core never speaks a wire protocol itself; hosts plug in
//! implementations of these traits (and mocks in tests).

pub mod classifier;
pub mod extractor;

pub use classifier::{MockRoleClassifier, RoleClassifier};
pub use extractor::{Extractor, MockExtractor};
