//! Role-classification collaborator contract (delegated mode).

use crate::error::{ProcapError, Result};
use crate::stream::frame::Role;
use std::sync::Arc;

/// Trait for the optional external question/answer classifier.
///
/// Used only in delegated mode; when the collaborator errors the
/// pipeline falls back to the lexical heuristic.
pub trait RoleClassifier: Send + Sync {
    /// Classifies one utterance as QUESTION or ANSWER.
    fn classify(&self, text: &str) -> Result<Role>;
}

/// Implement RoleClassifier for Arc<T> to allow sharing.
impl<T: RoleClassifier + ?Sized> RoleClassifier for Arc<T> {
    fn classify(&self, text: &str) -> Result<Role> {
        (**self).classify(text)
    }
}

/// Mock classifier for testing.
#[derive(Debug, Clone)]
pub struct MockRoleClassifier {
    role: Role,
    should_fail: bool,
}

impl MockRoleClassifier {
    /// Creates a mock that always returns the given role.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            should_fail: false,
        }
    }

    /// Configures the mock to fail, exercising the heuristic fallback.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl RoleClassifier for MockRoleClassifier {
    fn classify(&self, _text: &str) -> Result<Role> {
        if self.should_fail {
            Err(ProcapError::Classification {
                message: "mock classifier failure".to_string(),
            })
        } else {
            Ok(self.role)
        }
    }
}
