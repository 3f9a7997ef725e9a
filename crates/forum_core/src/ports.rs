//! crates/forum_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete persistence implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Answer, Chat, Collection, Comment, CommentParent, Question, Room, Tag, User};
use crate::vote::{VoteAction, VoteOutcome};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all store operations.
///
/// Expected domain failures (missing rows, duplicate membership, bad caller
/// input) are distinct variants so the boundary can branch on them without
/// string matching; everything the underlying driver throws unexpectedly is
/// folded into `Unexpected`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Create Payloads
//=========================================================================================
// The input shapes for the create operations. Identifiers are assigned by the
// store; timestamps are supplied by the caller so a client-side clock is
// honored the same way on every backend.

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    pub text: String,
    /// Tag names with descriptions; looked up or created idempotently by name.
    pub tags: Vec<NewTag>,
    pub asked_by: String,
    pub ask_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAnswer {
    pub question_id: Uuid,
    pub text: String,
    pub ans_by: String,
    pub ans_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub parent_id: Uuid,
    pub parent_type: CommentParent,
    pub text: String,
    pub comment_by: String,
    pub comment_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub name: String,
    /// Usernames present at creation, usually just the creator.
    pub users: Vec<String>,
    pub create_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChat {
    pub room_id: Uuid,
    pub text: String,
    pub typed_by: String,
    pub chat_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCollection {
    pub name: String,
    pub user: String,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Store Port (Trait)
//=========================================================================================

/// The persistence port for every forum aggregate.
///
/// All read methods return the populated form of the aggregate; the caller
/// never sees bare reference identifiers. Each method is attempted exactly
/// once, with no retry layer.
#[async_trait]
pub trait ForumStore: Send + Sync {
    // --- Users ---
    async fn get_user(&self, username: &str) -> StoreResult<User>;
    async fn save_user(&self, user: User) -> StoreResult<User>;

    // --- Tags ---
    async fn get_or_create_tag(&self, name: &str, description: &str) -> StoreResult<Tag>;

    // --- Questions ---
    /// Fetches every question, fully populated, in no particular order.
    /// Ordering and search filtering are applied in memory by the caller.
    async fn list_questions(&self) -> StoreResult<Vec<Question>>;
    /// Fetches a question without touching its view list.
    async fn get_question(&self, qid: Uuid) -> StoreResult<Question>;
    /// Fetches a question, first appending `username` to its view list if
    /// not already present (append-once set semantics).
    async fn get_question_and_record_view(
        &self,
        qid: Uuid,
        username: &str,
    ) -> StoreResult<Question>;
    async fn save_question(&self, new: NewQuestion) -> StoreResult<Question>;
    /// Runs the vote toggle for `(qid, username)` and persists the result.
    async fn vote_question(
        &self,
        qid: Uuid,
        username: &str,
        action: VoteAction,
    ) -> StoreResult<VoteOutcome>;

    // --- Answers and Comments ---
    async fn get_answer(&self, aid: Uuid) -> StoreResult<Answer>;
    async fn save_answer(&self, new: NewAnswer) -> StoreResult<Answer>;
    async fn save_comment(&self, new: NewComment) -> StoreResult<Comment>;

    // --- Rooms and Chats ---
    async fn list_rooms(&self) -> StoreResult<Vec<Room>>;
    async fn get_room(&self, rid: Uuid) -> StoreResult<Room>;
    async fn save_room(&self, new: NewRoom) -> StoreResult<Room>;
    async fn add_user_to_room(&self, rid: Uuid, username: &str) -> StoreResult<Room>;
    /// Saves a chat and returns it together with the re-read populated room.
    async fn save_chat(&self, new: NewChat) -> StoreResult<(Chat, Room)>;

    // --- Collections ---
    async fn list_collections(&self, user: &str) -> StoreResult<Vec<Collection>>;
    async fn get_collection(&self, cid: Uuid) -> StoreResult<Collection>;
    async fn save_collection(&self, new: NewCollection) -> StoreResult<Collection>;
    /// Rejects with `StoreError::Duplicate` if the question is already a
    /// member of the collection.
    async fn add_question_to_collection(&self, cid: Uuid, qid: Uuid) -> StoreResult<Collection>;
    async fn remove_question_from_collection(
        &self,
        cid: Uuid,
        qid: Uuid,
    ) -> StoreResult<Collection>;
    async fn rename_collection(&self, cid: Uuid, new_name: &str) -> StoreResult<Collection>;
    /// Deletes a collection and returns the owner's remaining collections so
    /// the caller can broadcast a refreshed list.
    async fn delete_collection(&self, cid: Uuid, user: &str) -> StoreResult<Vec<Collection>>;
}
