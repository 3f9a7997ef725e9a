pub mod collection;
pub mod domain;
pub mod order;
pub mod ports;
pub mod search;
pub mod vote;

pub use domain::{Answer, Chat, Collection, Comment, CommentParent, Question, Room, Tag, User};
pub use ports::{
    ForumStore, NewAnswer, NewChat, NewCollection, NewComment, NewQuestion, NewRoom, NewTag,
    StoreError, StoreResult,
};
pub use vote::{VoteAction, VoteKind, VoteOutcome};
