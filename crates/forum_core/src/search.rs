//! crates/forum_core/src/search.rs
//!
//! Free-text search filtering over questions and rooms.
//!
//! A question query is whitespace-tokenized; `[name]` tokens filter by exact
//! tag name and every other token is a keyword matched as a substring of the
//! title or body. A question survives when it carries *every* requested tag
//! and, if any keywords were given, matches at least one of them. Filtering
//! is stable: the relative input order is never changed.

use crate::domain::{Question, Room};

/// A parsed search string, split into its tag and keyword tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
}

impl SearchQuery {
    /// Tokenizes a raw search string. `[name]` becomes a tag token (empty
    /// brackets are ignored); anything else is a keyword token.
    pub fn parse(search: &str) -> Self {
        let mut query = SearchQuery::default();
        for token in search.split_whitespace() {
            match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                Some(name) if !name.is_empty() => query.tags.push(name.to_string()),
                Some(_) => {}
                None => query.keywords.push(token.to_string()),
            }
        }
        query
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.keywords.is_empty()
    }

    /// Whether a single question satisfies this query.
    pub fn matches(&self, question: &Question) -> bool {
        let tags_ok = self
            .tags
            .iter()
            .all(|wanted| question.tags.iter().any(|t| &t.name == wanted));
        let keywords_ok = self.keywords.is_empty()
            || self
                .keywords
                .iter()
                .any(|kw| question.title.contains(kw) || question.text.contains(kw));
        tags_ok && keywords_ok
    }
}

/// Filters a question list by a raw search string. An empty string is the
/// identity; an empty list stays empty regardless of the query.
pub fn filter_questions_by_search(questions: Vec<Question>, search: &str) -> Vec<Question> {
    let query = SearchQuery::parse(search);
    if query.is_empty() {
        return questions;
    }
    questions.into_iter().filter(|q| query.matches(q)).collect()
}

/// Filters rooms by a plain substring match against the room name. Rooms
/// have no tag concept, so the bracket syntax does not apply here.
pub fn filter_rooms_by_search(rooms: Vec<Room>, search: &str) -> Vec<Room> {
    if search.is_empty() {
        return rooms;
    }
    rooms.into_iter().filter(|r| r.name.contains(search)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;
    use chrono::Utc;
    use uuid::Uuid;

    fn tag(name: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
        }
    }

    fn question(title: &str, text: &str, tags: &[&str]) -> Question {
        Question {
            id: Uuid::new_v4(),
            title: title.to_string(),
            text: text.to_string(),
            tags: tags.iter().map(|t| tag(t)).collect(),
            asked_by: "abaya".to_string(),
            ask_date_time: Utc::now(),
            answers: vec![],
            views: vec![],
            up_votes: vec![],
            down_votes: vec![],
            comments: vec![],
        }
    }

    fn titles(qs: &[Question]) -> Vec<&str> {
        qs.iter().map(|q| q.title.as_str()).collect()
    }

    #[test]
    fn parse_splits_tag_and_keyword_tokens() {
        let query = SearchQuery::parse("[android] storage [react] leak");
        assert_eq!(query.tags, vec!["android", "react"]);
        assert_eq!(query.keywords, vec!["storage", "leak"]);
    }

    #[test]
    fn empty_search_is_identity() {
        let qs = vec![
            question("b", "", &["x"]),
            question("a", "", &[]),
            question("c", "", &["y"]),
        ];
        let filtered = filter_questions_by_search(qs.clone(), "");
        assert_eq!(filtered, qs);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(filter_questions_by_search(vec![], "[android] storage").is_empty());
    }

    #[test]
    fn tag_token_matches_exact_tag_name() {
        let qs = vec![
            question("tagged", "", &["android", "io"]),
            question("other", "", &["react"]),
        ];
        let filtered = filter_questions_by_search(qs, "[android]");
        assert_eq!(titles(&filtered), vec!["tagged"]);
    }

    #[test]
    fn tag_match_is_case_sensitive_as_stored() {
        let qs = vec![question("q", "", &["Android"])];
        assert!(filter_questions_by_search(qs, "[android]").is_empty());
    }

    #[test]
    fn two_tag_tokens_intersect() {
        let qs = vec![
            question("both", "", &["android", "storage"]),
            question("one", "", &["android"]),
            question("neither", "", &["react"]),
        ];
        let filtered = filter_questions_by_search(qs, "[android] [storage]");
        assert_eq!(titles(&filtered), vec!["both"]);
    }

    #[test]
    fn keyword_matches_title_or_body_substring() {
        let qs = vec![
            question("disk storage question", "", &[]),
            question("other", "the storage keeps filling", &[]),
            question("unrelated", "nothing here", &[]),
        ];
        let filtered = filter_questions_by_search(qs, "storage");
        assert_eq!(titles(&filtered), vec!["disk storage question", "other"]);
    }

    #[test]
    fn tags_and_keywords_combine() {
        // Scenario B: "[android] storage" matches the android-tagged question
        // whose body mentions storage, not the react one that also does.
        let qs = vec![
            question("q1", "running out of storage", &["android"]),
            question("q2", "storage hooks", &["react"]),
        ];
        let filtered = filter_questions_by_search(qs, "[android] storage");
        assert_eq!(titles(&filtered), vec!["q1"]);
    }

    #[test]
    fn tagged_question_without_keyword_hit_is_dropped() {
        let qs = vec![question("q1", "battery drain", &["android"])];
        assert!(filter_questions_by_search(qs, "[android] storage").is_empty());
    }

    #[test]
    fn empty_brackets_are_ignored() {
        let qs = vec![question("a", "", &[])];
        assert_eq!(filter_questions_by_search(qs, "[]").len(), 1);
    }

    #[test]
    fn room_filter_is_substring_on_name_only() {
        let room = |name: &str| Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            users: vec![],
            chats: vec![],
            create_date_time: Utc::now(),
        };
        let rooms = vec![room("rust beginners"), room("general"), room("rustaceans")];
        let filtered = filter_rooms_by_search(rooms.clone(), "rust");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].name, "rust beginners");
        assert_eq!(filter_rooms_by_search(rooms, "").len(), 3);
    }
}
