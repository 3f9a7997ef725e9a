//! services/api/src/web/questions.rs
//!
//! Axum handlers for questions, answers, comments and votes. Every mutation
//! validates at the boundary, persists through the store port, re-reads the
//! populated aggregate and publishes it to the event hub before responding.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use forum_core::domain::{Answer, Comment, CommentParent, Question};
use forum_core::order::{sort_questions, QuestionOrder};
use forum_core::ports::{NewAnswer, NewComment, NewQuestion};
use forum_core::search::filter_questions_by_search;
use forum_core::vote::{VoteAction, VoteOutcome};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::protocol::{CommentTarget, ServerEvent, Topic};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionListParams {
    pub order: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "askedBy")]
    pub asked_by: Option<String>,
}

/// Lists questions ordered by the requested criterion and filtered by the
/// search string and (optionally) the asking user.
pub async fn get_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuestionListParams>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let order = params
        .order
        .as_deref()
        .unwrap_or("newest")
        .parse::<QuestionOrder>()?;

    let mut questions = state.store.list_questions().await?;
    if let Some(asked_by) = params.asked_by.as_deref().filter(|u| !u.is_empty()) {
        questions.retain(|q| q.asked_by == asked_by);
    }
    let questions = sort_questions(questions, order);
    let questions = filter_questions_by_search(questions, params.search.as_deref().unwrap_or(""));
    Ok(Json(questions))
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub username: String,
}

/// Fetches one question, recording the requesting user in its view list.
pub async fn get_question_by_id(
    State(state): State<Arc<AppState>>,
    Path(qid): Path<Uuid>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Question>, ApiError> {
    if params.username.is_empty() {
        return Err(ApiError::BadRequest(
            "Invalid username requesting question.".to_string(),
        ));
    }

    let question = state
        .store
        .get_question_and_record_view(qid, &params.username)
        .await?;

    let event = ServerEvent::ViewsUpdate {
        question: question.clone(),
    };
    state.hub.publish(Topic::Questions, event.clone());
    state.hub.publish(Topic::Question { qid }, event);
    Ok(Json(question))
}

fn is_question_body_valid(q: &NewQuestion) -> bool {
    !q.title.is_empty() && !q.text.is_empty() && !q.tags.is_empty() && !q.asked_by.is_empty()
}

pub async fn add_question(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewQuestion>,
) -> Result<Json<Question>, ApiError> {
    if !is_question_body_valid(&new) {
        return Err(ApiError::BadRequest("Invalid question body".to_string()));
    }

    let question = state.store.save_question(new).await?;
    state.hub.publish(
        Topic::Questions,
        ServerEvent::QuestionUpdate {
            question: question.clone(),
        },
    );
    Ok(Json(question))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub qid: Uuid,
    pub username: String,
}

pub async fn upvote_question(
    state: State<Arc<AppState>>,
    req: Json<VoteRequest>,
) -> Result<Json<VoteOutcome>, ApiError> {
    vote(state, req, VoteAction::Upvote).await
}

pub async fn downvote_question(
    state: State<Arc<AppState>>,
    req: Json<VoteRequest>,
) -> Result<Json<VoteOutcome>, ApiError> {
    vote(state, req, VoteAction::Downvote).await
}

async fn vote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoteRequest>,
    action: VoteAction,
) -> Result<Json<VoteOutcome>, ApiError> {
    if req.username.is_empty() {
        return Err(ApiError::BadRequest("Invalid vote request".to_string()));
    }

    let outcome = state
        .store
        .vote_question(req.qid, &req.username, action)
        .await?;

    let event = ServerEvent::VoteUpdate {
        qid: req.qid,
        up_votes: outcome.up_votes.clone(),
        down_votes: outcome.down_votes.clone(),
    };
    state.hub.publish(Topic::Questions, event.clone());
    state.hub.publish(Topic::Question { qid: req.qid }, event);
    Ok(Json(outcome))
}

fn is_answer_body_valid(a: &NewAnswer) -> bool {
    !a.text.is_empty() && !a.ans_by.is_empty()
}

pub async fn add_answer(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewAnswer>,
) -> Result<Json<Answer>, ApiError> {
    if !is_answer_body_valid(&new) {
        return Err(ApiError::BadRequest("Invalid answer body".to_string()));
    }

    let qid = new.question_id;
    let answer = state.store.save_answer(new).await?;
    state.hub.publish(
        Topic::Question { qid },
        ServerEvent::AnswerUpdate {
            qid,
            answer: answer.clone(),
        },
    );
    Ok(Json(answer))
}

fn is_comment_body_valid(c: &NewComment) -> bool {
    !c.text.is_empty() && !c.comment_by.is_empty()
}

/// Adds a comment to a question or an answer, then re-reads the populated
/// parent so subscribers get the full updated aggregate.
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewComment>,
) -> Result<Json<Comment>, ApiError> {
    if !is_comment_body_valid(&new) {
        return Err(ApiError::BadRequest("Invalid comment body".to_string()));
    }

    let comment = state.store.save_comment(new).await?;

    let (qid, target) = match comment.parent_type {
        CommentParent::Question => {
            let question = state.store.get_question(comment.parent_id).await?;
            (question.id, CommentTarget::Question { question })
        }
        CommentParent::Answer => {
            let answer = state.store.get_answer(comment.parent_id).await?;
            (answer.question_id, CommentTarget::Answer { answer })
        }
    };
    state.hub.publish(
        Topic::Question { qid },
        ServerEvent::CommentUpdate { target },
    );
    Ok(Json(comment))
}
