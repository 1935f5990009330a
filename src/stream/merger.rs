//! Merger station: seal-ordered accumulation into the process memory.
//!
//! Extraction outcomes arrive in completion order; a sequence gate holds
//! early arrivals back and applies fragments strictly in seal order, so
//! the later-information-wins merge rule refers to interview time rather
//! than worker timing. Failed chunks advance the gate without merging.

use crate::memory::schema::ProcessMemory;
use crate::stream::frame::ExtractionOutcome;
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// Station that folds extraction outcomes into one [`ProcessMemory`].
pub struct MergerStation {
    memory: ProcessMemory,
    /// Out-of-order arrivals keyed by sequence; `None` marks a failed
    /// chunk that only advances the gate.
    pending: BTreeMap<u64, Option<crate::memory::Fragment>>,
    next_seq: u64,
    merged: u64,
    skipped: u64,
}

impl MergerStation {
    pub fn new() -> Self {
        Self {
            memory: ProcessMemory::default(),
            pending: BTreeMap::new(),
            next_seq: 0,
            merged: 0,
            skipped: 0,
        }
    }

    /// Applies one outcome, releasing any consecutive run it unblocks.
    pub fn apply(&mut self, outcome: ExtractionOutcome) {
        let (seq, fragment) = match outcome {
            ExtractionOutcome::Extracted { seq, fragment } => (seq, Some(fragment)),
            ExtractionOutcome::Failed { seq } => (seq, None),
        };

        // Stale duplicate of an already-applied sequence.
        if seq < self.next_seq {
            return;
        }
        self.pending.insert(seq, fragment);

        while let Some(slot) = self.pending.remove(&self.next_seq) {
            match slot {
                Some(fragment) => {
                    self.memory.merge(fragment);
                    self.merged += 1;
                }
                None => self.skipped += 1,
            }
            self.next_seq += 1;
        }
    }

    /// Fragments merged so far.
    pub fn merged(&self) -> u64 {
        self.merged
    }

    /// Chunks dropped after exhausting their retries.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn memory(&self) -> &ProcessMemory {
        &self.memory
    }

    /// Consumes the station, merging any stragglers in sequence order.
    pub fn into_memory(mut self) -> ProcessMemory {
        for (_, slot) in std::mem::take(&mut self.pending) {
            if let Some(fragment) = slot {
                self.memory.merge(fragment);
                self.merged += 1;
            } else {
                self.skipped += 1;
            }
        }
        self.memory
    }

    /// Runs the station until the input channel closes, then returns the
    /// accumulated memory.
    pub async fn run(mut self, mut input: mpsc::Receiver<ExtractionOutcome>) -> ProcessMemory {
        while let Some(outcome) = input.recv().await {
            self.apply(outcome);
        }
        if !self.pending.is_empty() {
            eprintln!(
                "procap: merging {} out-of-order fragment(s) left at shutdown",
                self.pending.len()
            );
        }
        if self.skipped > 0 {
            eprintln!("procap: {} chunk(s) contributed nothing after retries", self.skipped);
        }
        self.into_memory()
    }
}

impl Default for MergerStation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Fragment;

    fn owner_fragment(name: &str) -> Fragment {
        Fragment {
            owner: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn extracted(seq: u64, fragment: Fragment) -> ExtractionOutcome {
        ExtractionOutcome::Extracted { seq, fragment }
    }

    #[test]
    fn test_in_order_outcomes_merge_immediately() {
        let mut station = MergerStation::new();
        station.apply(extracted(0, owner_fragment("Alice")));
        station.apply(extracted(1, owner_fragment("Bob")));

        assert_eq!(station.merged(), 2);
        assert_eq!(station.memory().owner.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_early_arrival_is_held_back() {
        let mut station = MergerStation::new();

        // Chunk 1 finishes first; it must not merge before chunk 0.
        station.apply(extracted(1, owner_fragment("Bob")));
        assert_eq!(station.merged(), 0);
        assert!(station.memory().owner.is_none());

        station.apply(extracted(0, owner_fragment("Alice")));
        assert_eq!(station.merged(), 2);
        // Seal order decides: chunk 1's value lands last.
        assert_eq!(station.memory().owner.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_failed_outcome_advances_the_gate() {
        let mut station = MergerStation::new();

        station.apply(extracted(1, owner_fragment("Bob")));
        assert_eq!(station.merged(), 0);

        station.apply(ExtractionOutcome::Failed { seq: 0 });
        assert_eq!(station.skipped(), 1);
        assert_eq!(station.merged(), 1);
        assert_eq!(station.memory().owner.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_duplicate_outcome_is_ignored() {
        let mut station = MergerStation::new();
        let fragment = Fragment {
            open_questions: vec!["What about refunds?".to_string()],
            ..Default::default()
        };

        station.apply(extracted(0, fragment.clone()));
        station.apply(extracted(0, fragment));

        assert_eq!(station.merged(), 1);
        assert_eq!(station.memory().open_questions.len(), 1);
    }

    #[test]
    fn test_seal_order_decides_scalar_winner() {
        let mut forward = MergerStation::new();
        forward.apply(extracted(0, owner_fragment("Alice")));
        forward.apply(extracted(1, owner_fragment("Bob")));
        assert_eq!(forward.memory().owner.as_deref(), Some("Bob"));

        // Same fragments, reversed completion order: same result.
        let mut reversed = MergerStation::new();
        reversed.apply(extracted(1, owner_fragment("Bob")));
        reversed.apply(extracted(0, owner_fragment("Alice")));
        assert_eq!(reversed.memory().owner.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_into_memory_drains_stragglers_in_order() {
        let mut station = MergerStation::new();
        // Sequence 1 never arrives; 2 and 3 are stuck behind it.
        station.apply(extracted(0, owner_fragment("Alice")));
        station.apply(extracted(3, owner_fragment("Carol")));
        station.apply(extracted(2, owner_fragment("Bob")));
        assert_eq!(station.merged(), 1);

        let memory = station.into_memory();
        assert_eq!(memory.owner.as_deref(), Some("Carol"));
    }

    #[tokio::test]
    async fn test_run_returns_memory_when_channel_closes() {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(MergerStation::new().run(rx));

        tx.send(extracted(0, owner_fragment("Alice"))).await.unwrap();
        tx.send(ExtractionOutcome::Failed { seq: 1 }).await.unwrap();
        drop(tx);

        let memory = handle.await.unwrap();
        assert_eq!(memory.owner.as_deref(), Some("Alice"));
    }
}
