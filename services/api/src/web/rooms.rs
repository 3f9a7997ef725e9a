//! services/api/src/web/rooms.rs
//!
//! Axum handlers for chat rooms and their messages.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use forum_core::domain::{Chat, Room};
use forum_core::order::{sort_rooms, RoomOrder};
use forum_core::ports::{NewChat, NewRoom};
use forum_core::search::filter_rooms_by_search;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::protocol::{ServerEvent, Topic};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoomListParams {
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Lists rooms ordered by the requested criterion and filtered by a name
/// keyword.
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RoomListParams>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let order = params
        .order
        .as_deref()
        .unwrap_or("newest")
        .parse::<RoomOrder>()?;

    let rooms = state.store.list_rooms().await?;
    let rooms = sort_rooms(rooms, order);
    let rooms = filter_rooms_by_search(rooms, params.search.as_deref().unwrap_or(""));
    Ok(Json(rooms))
}

pub async fn get_room_by_id(
    State(state): State<Arc<AppState>>,
    Path(rid): Path<Uuid>,
) -> Result<Json<Room>, ApiError> {
    let room = state.store.get_room(rid).await?;
    Ok(Json(room))
}

pub async fn add_room(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewRoom>,
) -> Result<Json<Room>, ApiError> {
    if new.name.is_empty() {
        return Err(ApiError::BadRequest("Invalid room body".to_string()));
    }

    let room = state.store.save_room(new).await?;
    state
        .hub
        .publish(Topic::Rooms, ServerEvent::RoomUpdate { room: room.clone() });
    Ok(Json(room))
}

#[derive(Debug, Deserialize)]
pub struct AddUserToRoomRequest {
    pub rid: Uuid,
    pub username: String,
}

pub async fn add_user_to_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddUserToRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    if req.username.is_empty() {
        return Err(ApiError::BadRequest("Invalid user body".to_string()));
    }

    let room = state.store.add_user_to_room(req.rid, &req.username).await?;
    let event = ServerEvent::RoomUpdate { room: room.clone() };
    state.hub.publish(Topic::Rooms, event.clone());
    state.hub.publish(Topic::Room { rid: req.rid }, event);
    Ok(Json(room))
}

fn is_chat_body_valid(chat: &NewChat) -> bool {
    !chat.text.is_empty() && !chat.typed_by.is_empty()
}

/// Saves a chat and pushes the re-read populated room to the room's
/// subscribers.
pub async fn add_chat(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewChat>,
) -> Result<Json<Chat>, ApiError> {
    if !is_chat_body_valid(&new) {
        return Err(ApiError::BadRequest("Invalid chat body".to_string()));
    }

    let rid = new.room_id;
    let (chat, room) = state.store.save_chat(new).await?;
    state
        .hub
        .publish(Topic::Room { rid }, ServerEvent::ChatUpdate { room });
    Ok(Json(chat))
}
