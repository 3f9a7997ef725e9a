//! crates/forum_core/src/order.rs
//!
//! Pure ordering functions over the in-memory aggregate lists. Each function
//! takes the list by value and returns a reordered list; input order is
//! preserved on ties (stable sort) and an empty input yields an empty output.

use std::str::FromStr;

use crate::domain::{Collection, Question, Room};
use crate::ports::StoreError;

/// The orderings a question list can be requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    Newest,
    Unanswered,
    Active,
    MostViewed,
}

impl FromStr for QuestionOrder {
    type Err = StoreError;

    // The wire names are the ones the original REST surface used.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "unanswered" => Ok(Self::Unanswered),
            "active" => Ok(Self::Active),
            "mostViewed" => Ok(Self::MostViewed),
            other => Err(StoreError::InvalidArgument(format!(
                "Unknown question order: {other}"
            ))),
        }
    }
}

/// The orderings a room list can be requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOrder {
    Newest,
    MostUsers,
}

impl FromStr for RoomOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "mostUsers" => Ok(Self::MostUsers),
            other => Err(StoreError::InvalidArgument(format!(
                "Unknown room order: {other}"
            ))),
        }
    }
}

/// The orderings a collection list can be requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOrder {
    Newest,
    MostQuestions,
}

impl FromStr for CollectionOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "mostQuestions" => Ok(Self::MostQuestions),
            other => Err(StoreError::InvalidArgument(format!(
                "Unknown collection order: {other}"
            ))),
        }
    }
}

/// Reorders (and for `Unanswered`, filters) a question list.
pub fn sort_questions(mut questions: Vec<Question>, order: QuestionOrder) -> Vec<Question> {
    match order {
        QuestionOrder::Newest => {
            questions.sort_by(|a, b| b.ask_date_time.cmp(&a.ask_date_time));
            questions
        }
        QuestionOrder::Unanswered => {
            questions.retain(|q| q.answers.is_empty());
            sort_questions(questions, QuestionOrder::Newest)
        }
        QuestionOrder::Active => {
            questions.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
            questions
        }
        QuestionOrder::MostViewed => {
            questions.sort_by(|a, b| b.views.len().cmp(&a.views.len()));
            questions
        }
    }
}

pub fn sort_rooms(mut rooms: Vec<Room>, order: RoomOrder) -> Vec<Room> {
    match order {
        RoomOrder::Newest => {
            rooms.sort_by(|a, b| b.create_date_time.cmp(&a.create_date_time));
        }
        RoomOrder::MostUsers => {
            rooms.sort_by(|a, b| b.users.len().cmp(&a.users.len()));
        }
    }
    rooms
}

pub fn sort_collections(mut collections: Vec<Collection>, order: CollectionOrder) -> Vec<Collection> {
    match order {
        CollectionOrder::Newest => {
            collections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        CollectionOrder::MostQuestions => {
            collections.sort_by(|a, b| b.questions.len().cmp(&a.questions.len()));
        }
    }
    collections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Answer;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn question(title: &str, asked_secs: i64, answer_secs: &[i64], views: usize) -> Question {
        let id = Uuid::new_v4();
        Question {
            id,
            title: title.to_string(),
            text: String::new(),
            tags: vec![],
            asked_by: "ihba001".to_string(),
            ask_date_time: Utc.timestamp_opt(asked_secs, 0).unwrap(),
            answers: answer_secs
                .iter()
                .map(|s| Answer {
                    id: Uuid::new_v4(),
                    question_id: id,
                    text: String::new(),
                    ans_by: "saltyPeter".to_string(),
                    ans_date_time: Utc.timestamp_opt(*s, 0).unwrap(),
                    comments: vec![],
                })
                .collect(),
            views: (0..views).map(|i| format!("viewer{i}")).collect(),
            up_votes: vec![],
            down_votes: vec![],
            comments: vec![],
        }
    }

    fn titles(qs: &[Question]) -> Vec<&str> {
        qs.iter().map(|q| q.title.as_str()).collect()
    }

    #[test]
    fn newest_sorts_descending_by_ask_time() {
        let qs = vec![
            question("old", 100, &[], 0),
            question("new", 300, &[], 0),
            question("mid", 200, &[], 0),
        ];
        let sorted = sort_questions(qs, QuestionOrder::Newest);
        assert_eq!(titles(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn newest_preserves_length() {
        let qs = vec![question("a", 1, &[], 0), question("b", 2, &[], 0)];
        assert_eq!(sort_questions(qs, QuestionOrder::Newest).len(), 2);
    }

    #[test]
    fn unanswered_filters_then_orders_newest() {
        let qs = vec![
            question("answered", 400, &[500], 0),
            question("bare_old", 100, &[], 0),
            question("bare_new", 200, &[], 0),
        ];
        let sorted = sort_questions(qs, QuestionOrder::Unanswered);
        assert_eq!(titles(&sorted), vec!["bare_new", "bare_old"]);
        assert!(sorted.iter().all(|q| q.answers.is_empty()));
    }

    #[test]
    fn active_uses_latest_answer_time() {
        // "quiet" was asked last but "busy" got an answer even later.
        let qs = vec![
            question("busy", 100, &[900], 0),
            question("quiet", 500, &[], 0),
        ];
        let sorted = sort_questions(qs, QuestionOrder::Active);
        assert_eq!(titles(&sorted), vec!["busy", "quiet"]);
    }

    #[test]
    fn active_is_stable_on_ties() {
        let qs = vec![
            question("first", 100, &[], 0),
            question("second", 100, &[], 0),
        ];
        let sorted = sort_questions(qs, QuestionOrder::Active);
        assert_eq!(titles(&sorted), vec!["first", "second"]);
    }

    #[test]
    fn most_viewed_sorts_descending_and_is_stable() {
        // Scenario A: [{answers:0,views:0},{answers:2,views:5}] -> [2,1].
        let qs = vec![
            question("one", 100, &[], 0),
            question("two", 100, &[200, 300], 5),
        ];
        let sorted = sort_questions(qs, QuestionOrder::MostViewed);
        assert_eq!(titles(&sorted), vec!["two", "one"]);

        let tied = vec![
            question("a", 1, &[], 3),
            question("b", 2, &[], 3),
            question("c", 3, &[], 3),
        ];
        let sorted = sort_questions(tied, QuestionOrder::MostViewed);
        assert_eq!(titles(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        for order in [
            QuestionOrder::Newest,
            QuestionOrder::Unanswered,
            QuestionOrder::Active,
            QuestionOrder::MostViewed,
        ] {
            let qs = vec![
                question("a", 300, &[350], 2),
                question("b", 100, &[], 9),
                question("c", 200, &[600], 0),
            ];
            let once = sort_questions(qs, order);
            let twice = sort_questions(once.clone(), order);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        for order in [
            QuestionOrder::Newest,
            QuestionOrder::Unanswered,
            QuestionOrder::Active,
            QuestionOrder::MostViewed,
        ] {
            assert!(sort_questions(vec![], order).is_empty());
        }
    }

    #[test]
    fn unknown_order_is_rejected() {
        assert!("hottest".parse::<QuestionOrder>().is_err());
        assert!("".parse::<QuestionOrder>().is_err());
        assert_eq!(
            "mostViewed".parse::<QuestionOrder>().unwrap(),
            QuestionOrder::MostViewed
        );
    }

    #[test]
    fn rooms_sort_by_member_count() {
        let room = |name: &str, users: usize, secs: i64| Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            users: (0..users).map(|i| format!("u{i}")).collect(),
            chats: vec![],
            create_date_time: Utc.timestamp_opt(secs, 0).unwrap(),
        };
        let rooms = vec![room("small", 1, 300), room("big", 4, 100)];
        let by_users = sort_rooms(rooms.clone(), RoomOrder::MostUsers);
        assert_eq!(by_users[0].name, "big");
        let by_age = sort_rooms(rooms, RoomOrder::Newest);
        assert_eq!(by_age[0].name, "small");
    }

    #[test]
    fn collections_sort_by_question_count() {
        let collection = |name: &str, n: usize, secs: i64| Collection {
            id: Uuid::new_v4(),
            name: name.to_string(),
            user: "ihba001".to_string(),
            questions: (0..n).map(|i| question(&format!("q{i}"), 1, &[], 0)).collect(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        };
        let cs = vec![collection("thin", 0, 500), collection("fat", 3, 100)];
        let by_count = sort_collections(cs.clone(), CollectionOrder::MostQuestions);
        assert_eq!(by_count[0].name, "fat");
        let by_age = sort_collections(cs, CollectionOrder::Newest);
        assert_eq!(by_age[0].name, "thin");
    }
}
