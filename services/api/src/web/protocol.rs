//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! API server. Clients register interest in topics; the server pushes an
//! event envelope for every mutation on a subscribed topic.

use forum_core::domain::{Answer, Collection, Question, Room, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Topics
//=========================================================================================

/// A subscription topic. Every published event is addressed to one topic and
/// only connections subscribed to it receive the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Topic {
    /// The question index: new questions, votes, views.
    Questions,
    /// A single question's page: answers, comments, votes, views.
    Question { qid: Uuid },
    /// The room index.
    Rooms,
    /// A single room: chats and membership changes.
    Room { rid: Uuid },
    /// One user's collection list.
    Collections { user: String },
    /// Profile creation and edits.
    Users,
}

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Adds topics to this connection's subscription set.
    Subscribe { topics: Vec<Topic> },

    /// Removes topics from this connection's subscription set.
    Unsubscribe { topics: Vec<Topic> },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// The parent aggregate a comment landed on, re-read in populated form.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "parent_type", rename_all = "snake_case")]
pub enum CommentTarget {
    Question { question: Question },
    Answer { answer: Answer },
}

/// Represents the structured update events the server pushes to subscribers.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A question was created or edited; carries the populated aggregate.
    QuestionUpdate { question: Question },

    /// An answer was added to a question.
    AnswerUpdate { qid: Uuid, answer: Answer },

    /// A question's view list grew.
    ViewsUpdate { question: Question },

    /// A vote toggled; carries only the vote lists, not the whole question.
    VoteUpdate {
        qid: Uuid,
        up_votes: Vec<String>,
        down_votes: Vec<String>,
    },

    /// A comment was added to a question or an answer.
    CommentUpdate { target: CommentTarget },

    /// A user profile was created.
    UserUpdate { user: User },

    /// A room was created or its membership changed.
    RoomUpdate { room: Room },

    /// A chat was posted; carries the populated room.
    ChatUpdate { room: Room },

    /// A collection changed; carries the populated aggregate.
    CollectionUpdate { collection: Collection },

    /// A collection was deleted; carries the owner's remaining collections.
    CollectionListUpdate { collections: Vec<Collection> },
}

/// The wire frame for every push: the topic it was addressed to plus the
/// event itself, so clients can route without re-deriving the topic.
#[derive(Serialize, Debug, Clone)]
pub struct EventEnvelope {
    pub topic: Topic,
    pub event: ServerEvent,
}
