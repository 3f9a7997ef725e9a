//! services/api/src/web/users.rs
//!
//! Axum handlers for user profiles.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use forum_core::domain::User;
use serde::Deserialize;

use crate::error::ApiError;
use crate::web::protocol::{ServerEvent, Topic};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub username: String,
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<User>, ApiError> {
    if params.username.is_empty() {
        return Err(ApiError::BadRequest(
            "Invalid username requesting user.".to_string(),
        ));
    }
    let user = state.store.get_user(&params.username).await?;
    Ok(Json(user))
}

fn is_user_body_valid(user: &User) -> bool {
    !user.username.is_empty() && !user.email.is_empty() && !user.pfp.is_empty() && !user.bio.is_empty()
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<User>,
) -> Result<Json<User>, ApiError> {
    if !is_user_body_valid(&user) {
        return Err(ApiError::BadRequest("Invalid user body".to_string()));
    }

    let user = state.store.save_user(user).await?;
    state
        .hub
        .publish(Topic::Users, ServerEvent::UserUpdate { user: user.clone() });
    Ok(Json(user))
}
