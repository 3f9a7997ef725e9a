//! crates/forum_core/src/collection.rs
//!
//! Membership rules for question collections. A question may appear at most
//! once per collection; the duplicate check happens before any insert.

use uuid::Uuid;

use crate::domain::{Collection, Question};
use crate::ports::{StoreError, StoreResult};

/// The expected-error message for a duplicate insert.
pub const DUPLICATE_QUESTION: &str = "Question already exists in the collection.";

pub fn contains_question(collection: &Collection, qid: Uuid) -> bool {
    collection.questions.iter().any(|q| q.id == qid)
}

/// Appends a question to the collection, rejecting a duplicate with an
/// explicit `StoreError::Duplicate` and leaving the collection unchanged.
pub fn add_question(collection: &mut Collection, question: Question) -> StoreResult<()> {
    if contains_question(collection, question.id) {
        return Err(StoreError::Duplicate(DUPLICATE_QUESTION.to_string()));
    }
    collection.questions.push(question);
    Ok(())
}

/// Removes a question by id. Removing an absent question is a no-op.
pub fn remove_question(collection: &mut Collection, qid: Uuid) {
    collection.questions.retain(|q| q.id != qid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(title: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            title: title.to_string(),
            text: String::new(),
            tags: vec![],
            asked_by: "monkeyABC".to_string(),
            ask_date_time: Utc::now(),
            answers: vec![],
            views: vec![],
            up_votes: vec![],
            down_votes: vec![],
            comments: vec![],
        }
    }

    fn collection(questions: Vec<Question>) -> Collection {
        Collection {
            id: Uuid::new_v4(),
            name: "favorites".to_string(),
            user: "monkeyABC".to_string(),
            questions,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn add_appends_new_question() {
        let mut c = collection(vec![]);
        add_question(&mut c, question("q1")).unwrap();
        assert_eq!(c.questions.len(), 1);
    }

    #[test]
    fn duplicate_add_is_rejected_and_collection_unchanged() {
        // Scenario D.
        let q1 = question("q1");
        let mut c = collection(vec![q1.clone()]);
        let before = c.questions.clone();
        let err = add_question(&mut c, q1).unwrap_err();
        match err {
            StoreError::Duplicate(msg) => assert_eq!(msg, DUPLICATE_QUESTION),
            other => panic!("expected Duplicate, got {other:?}"),
        }
        assert_eq!(c.questions, before);
    }

    #[test]
    fn remove_deletes_by_id() {
        let q1 = question("q1");
        let q2 = question("q2");
        let mut c = collection(vec![q1.clone(), q2.clone()]);
        remove_question(&mut c, q1.id);
        assert_eq!(c.questions.len(), 1);
        assert_eq!(c.questions[0].id, q2.id);
    }

    #[test]
    fn remove_of_absent_question_is_noop() {
        let mut c = collection(vec![question("q1")]);
        remove_question(&mut c, Uuid::new_v4());
        assert_eq!(c.questions.len(), 1);
    }
}
