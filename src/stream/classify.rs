//! Question/answer classification.
//!
//! Two interchangeable strategies behind one contract: a fast lexical
//! heuristic, and delegation to an external collaborator that falls back
//! to the heuristic whenever the collaborator is unavailable. Ambiguous
//! utterances default to ANSWER — they are never dropped.

use crate::llm::classifier::RoleClassifier;
use crate::stream::frame::Role;
use std::sync::Arc;

/// Interrogative openers that mark a question even without a question
/// mark.
const QUESTION_STARTERS: &[&str] = &[
    "how ",
    "what ",
    "when ",
    "where ",
    "why ",
    "who ",
    "which ",
    "can ",
    "could ",
    "would ",
    "do ",
    "does ",
    "did ",
    "please explain",
    "walk me through",
];

/// Imperative prompts interviewers use in place of questions.
const PROMPT_STARTERS: &[&str] = &["describe ", "outline ", "explain ", "detail ", "tell me "];

/// Classifies an utterance by lexical cues alone.
///
/// Fast and deterministic; may misclassify ambiguous statements, which
/// is an acceptable degraded mode.
pub fn heuristic_classify(text: &str) -> Role {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Role::Answer;
    }
    if text.ends_with('?') {
        return Role::Question;
    }
    if QUESTION_STARTERS.iter().any(|s| text.starts_with(s)) {
        return Role::Question;
    }
    if PROMPT_STARTERS.iter().any(|s| text.starts_with(s)) {
        return Role::Question;
    }
    Role::Answer
}

/// Classifies through the delegated collaborator, falling back to the
/// heuristic on any failure.
///
/// The collaborator call may block, so it runs on the blocking pool.
pub(crate) async fn classify_delegated(
    classifier: Arc<dyn RoleClassifier>,
    text: String,
) -> Role {
    let call_text = text.clone();
    let outcome =
        tokio::task::spawn_blocking(move || classifier.classify(&call_text)).await;

    match outcome {
        Ok(Ok(Role::Question)) => Role::Question,
        Ok(Ok(_)) => Role::Answer,
        Ok(Err(e)) => {
            eprintln!("procap: delegated classification failed ({e}); using heuristic");
            heuristic_classify(&text)
        }
        Err(e) => {
            eprintln!("procap: classification task panicked ({e}); using heuristic");
            heuristic_classify(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::classifier::MockRoleClassifier;

    #[test]
    fn test_question_mark_is_question() {
        assert_eq!(heuristic_classify("It works how?"), Role::Question);
        assert_eq!(heuristic_classify("Who owns it?"), Role::Question);
    }

    #[test]
    fn test_interrogative_starters() {
        assert_eq!(
            heuristic_classify("What triggers the process"),
            Role::Question
        );
        assert_eq!(
            heuristic_classify("walk me through the approval flow"),
            Role::Question
        );
        assert_eq!(
            heuristic_classify("Could anyone else approve it"),
            Role::Question
        );
    }

    #[test]
    fn test_imperative_prompts_are_questions() {
        assert_eq!(
            heuristic_classify("Describe the escalation path"),
            Role::Question
        );
        assert_eq!(
            heuristic_classify("tell me about the handoff"),
            Role::Question
        );
    }

    #[test]
    fn test_statements_are_answers() {
        assert_eq!(
            heuristic_classify("It starts when a customer submits an application."),
            Role::Answer
        );
        assert_eq!(heuristic_classify("Sarah Johnson owns it."), Role::Answer);
    }

    #[test]
    fn test_empty_defaults_to_answer() {
        assert_eq!(heuristic_classify(""), Role::Answer);
        assert_eq!(heuristic_classify("   "), Role::Answer);
    }

    #[test]
    fn test_ambiguous_defaults_to_answer() {
        // No interrogative cue: never dropped, treated as answer.
        assert_eq!(heuristic_classify("The dashboard, mostly"), Role::Answer);
    }

    #[tokio::test]
    async fn test_delegated_uses_collaborator() {
        let classifier: Arc<dyn RoleClassifier> =
            Arc::new(MockRoleClassifier::new(Role::Question));
        let role = classify_delegated(classifier, "ambiguous text".to_string()).await;
        assert_eq!(role, Role::Question);
    }

    #[tokio::test]
    async fn test_delegated_unknown_becomes_answer() {
        let classifier: Arc<dyn RoleClassifier> =
            Arc::new(MockRoleClassifier::new(Role::Unknown));
        let role = classify_delegated(classifier, "ambiguous text".to_string()).await;
        assert_eq!(role, Role::Answer);
    }

    #[tokio::test]
    async fn test_delegated_falls_back_to_heuristic_on_failure() {
        let classifier: Arc<dyn RoleClassifier> =
            Arc::new(MockRoleClassifier::new(Role::Answer).with_failure());
        let role = classify_delegated(classifier, "Who owns it?".to_string()).await;
        assert_eq!(role, Role::Question);
    }
}
