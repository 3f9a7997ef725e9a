//! crates/forum_core/src/vote.rs
//!
//! The vote toggle state machine. Per (question, user) pair the state is one
//! of none / upvoted / downvoted; repeating an action cancels it and the
//! opposite action switches sides. The two vote lists stay disjoint.

use serde::Serialize;

/// The action a user submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Upvote,
    Downvote,
}

/// What the toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Upvoted,
    Downvoted,
    Cancelled,
}

/// The result of a vote transition: a human-readable status plus the full
/// resulting vote lists, ready to persist and broadcast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteOutcome {
    pub kind: VoteKind,
    pub msg: String,
    pub up_votes: Vec<String>,
    pub down_votes: Vec<String>,
}

/// Applies one vote action for `username` to the current vote lists.
///
/// The input lists are taken by value and returned inside the outcome with
/// the transition applied. After any transition the user appears in at most
/// one of the two lists.
pub fn apply_vote(
    mut up_votes: Vec<String>,
    mut down_votes: Vec<String>,
    username: &str,
    action: VoteAction,
) -> VoteOutcome {
    let was_up = up_votes.iter().any(|u| u == username);
    let was_down = down_votes.iter().any(|u| u == username);
    up_votes.retain(|u| u != username);
    down_votes.retain(|u| u != username);

    let (kind, msg) = match action {
        VoteAction::Upvote if was_up => (VoteKind::Cancelled, "Upvote cancelled successfully"),
        VoteAction::Upvote => {
            up_votes.push(username.to_string());
            (VoteKind::Upvoted, "Question upvoted successfully")
        }
        VoteAction::Downvote if was_down => {
            (VoteKind::Cancelled, "Downvote cancelled successfully")
        }
        VoteAction::Downvote => {
            down_votes.push(username.to_string());
            (VoteKind::Downvoted, "Question downvoted successfully")
        }
    };

    VoteOutcome {
        kind,
        msg: msg.to_string(),
        up_votes,
        down_votes,
    }
}
