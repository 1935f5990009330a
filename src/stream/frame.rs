//! Value types flowing between pipeline stations.

use crate::memory::Fragment;
use std::time::Instant;

/// Conversational role of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Interviewer asking about the process. Kept as context only.
    Question,
    /// Subject matter expert describing the process.
    Answer,
    /// Not yet classified.
    Unknown,
}

/// One unit of spoken or transcribed text.
///
/// Immutable once classified; arrival order is preserved through
/// chunking.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    pub received_at: Instant,
    pub role: Role,
}

impl Utterance {
    /// Creates an unclassified utterance timestamped now.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            received_at: Instant::now(),
            role: Role::Unknown,
        }
    }

    /// Creates an utterance with a pre-assigned role, bypassing
    /// classification.
    pub fn with_role(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            received_at: Instant::now(),
            role,
        }
    }
}

/// Why a chunk was sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Token target reached on a sentence boundary.
    Size,
    /// Hard token ceiling reached.
    Max,
    /// No new utterance within the idle-flush window.
    Idle,
    /// Session end or end-of-input.
    Force,
}

/// A sealed batch of answer text, consumed exactly once by extraction.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Seal-order sequence number; the merge gate applies fragments in
    /// this order.
    pub seq: u64,
    pub answer_text: String,
    /// Snapshot of recent interviewer questions, oldest first.
    pub context: Vec<String>,
    pub token_estimate: usize,
    pub opened_at: Instant,
    pub closed_reason: CloseReason,
}

impl Chunk {
    /// Renders the question context for the extraction prompt.
    pub fn context_text(&self) -> String {
        if self.context.is_empty() {
            "No recent questions".to_string()
        } else {
            self.context.join("; ")
        }
    }
}

/// Result of extracting one chunk, successful or not.
///
/// Failed outcomes still carry the sequence number so the merge gate
/// can advance past dropped chunks.
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Extracted { seq: u64, fragment: Fragment },
    Failed { seq: u64 },
}

impl ExtractionOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            ExtractionOutcome::Extracted { seq, .. } => *seq,
            ExtractionOutcome::Failed { seq } => *seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_utterance_is_unclassified() {
        let utterance = Utterance::new("It starts with a customer call.");
        assert_eq!(utterance.role, Role::Unknown);
        assert_eq!(utterance.text, "It starts with a customer call.");
    }

    #[test]
    fn test_with_role_preassigns() {
        let utterance = Utterance::with_role("Who owns it?", Role::Question);
        assert_eq!(utterance.role, Role::Question);
    }

    #[test]
    fn test_context_text_with_questions() {
        let chunk = Chunk {
            seq: 0,
            answer_text: "text".to_string(),
            context: vec!["What triggers it?".to_string(), "Who owns it?".to_string()],
            token_estimate: 1,
            opened_at: Instant::now(),
            closed_reason: CloseReason::Size,
        };
        assert_eq!(chunk.context_text(), "What triggers it?; Who owns it?");
    }

    #[test]
    fn test_context_text_without_questions() {
        let chunk = Chunk {
            seq: 0,
            answer_text: "text".to_string(),
            context: Vec::new(),
            token_estimate: 1,
            opened_at: Instant::now(),
            closed_reason: CloseReason::Force,
        };
        assert_eq!(chunk.context_text(), "No recent questions");
    }

    #[test]
    fn test_outcome_seq() {
        let extracted = ExtractionOutcome::Extracted {
            seq: 3,
            fragment: Fragment::default(),
        };
        let failed = ExtractionOutcome::Failed { seq: 7 };
        assert_eq!(extracted.seq(), 3);
        assert_eq!(failed.seq(), 7);
    }
}
