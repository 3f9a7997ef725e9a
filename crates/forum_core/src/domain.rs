//! crates/forum_core/src/domain.rs
//!
//! Defines the pure, core data structures for the forum.
//! These structs are the *populated* form of each aggregate: every stored
//! reference has already been resolved into the embedded object, so a value
//! here is ready to be returned from a read path or pushed over the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag attached to questions. Tags are deduplicated by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// What a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentParent {
    Question,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub comment_by: String,
    pub comment_date_time: DateTime<Utc>,
    /// The question or answer this comment hangs off.
    pub parent_id: Uuid,
    pub parent_type: CommentParent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub ans_by: String,
    pub ans_date_time: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

/// A question with all of its children resolved.
///
/// Invariant: a username appears in at most one of `up_votes` / `down_votes`,
/// and at most once in `views`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub tags: Vec<Tag>,
    pub asked_by: String,
    pub ask_date_time: DateTime<Utc>,
    pub answers: Vec<Answer>,
    pub views: Vec<String>,
    pub up_votes: Vec<String>,
    pub down_votes: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Question {
    /// The timestamp of the most recent activity on this question: the ask
    /// time, or the newest answer if one is later.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.answers
            .iter()
            .map(|a| a.ans_date_time)
            .max()
            .map_or(self.ask_date_time, |t| t.max(self.ask_date_time))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub room_id: Uuid,
    pub text: String,
    pub typed_by: String,
    pub chat_date_time: DateTime<Utc>,
}

/// A chat room with its member list and message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub users: Vec<String>,
    pub chats: Vec<Chat>,
    pub create_date_time: DateTime<Utc>,
}

/// A user-curated set of questions.
///
/// Invariant: each question id appears at most once in `questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub user: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

// Represents a forum member - used throughout the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub pfp: String,
    pub bio: String,
}
