//! services/api/src/web/collections.rs
//!
//! Axum handlers for question collections. Collection events are addressed
//! to the owner's topic, so only clients watching that user's collections
//! receive them.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use forum_core::domain::Collection;
use forum_core::order::{sort_collections, CollectionOrder};
use forum_core::ports::NewCollection;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::protocol::{ServerEvent, Topic};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CollectionListParams {
    pub order: Option<String>,
    pub user: Option<String>,
}

/// Lists one user's collections ordered by the requested criterion.
pub async fn get_collections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CollectionListParams>,
) -> Result<Json<Vec<Collection>>, ApiError> {
    let user = match params.user.as_deref() {
        Some(user) if !user.is_empty() => user,
        _ => return Err(ApiError::BadRequest("Invalid username".to_string())),
    };
    let order = params
        .order
        .as_deref()
        .unwrap_or("newest")
        .parse::<CollectionOrder>()?;

    let collections = state.store.list_collections(user).await?;
    Ok(Json(sort_collections(collections, order)))
}

pub async fn get_collection_by_id(
    State(state): State<Arc<AppState>>,
    Path(cid): Path<Uuid>,
) -> Result<Json<Collection>, ApiError> {
    let collection = state.store.get_collection(cid).await?;
    Ok(Json(collection))
}

pub async fn add_collection(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewCollection>,
) -> Result<Json<Collection>, ApiError> {
    if new.name.is_empty() || new.user.is_empty() {
        return Err(ApiError::BadRequest("Invalid collection body".to_string()));
    }

    let collection = state.store.save_collection(new).await?;
    publish_collection(&state, collection.clone());
    Ok(Json(collection))
}

#[derive(Debug, Deserialize)]
pub struct ModifyCollectionRequest {
    pub cid: Uuid,
    pub qid: Uuid,
}

pub async fn add_question_to_collection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModifyCollectionRequest>,
) -> Result<Json<Collection>, ApiError> {
    let collection = state
        .store
        .add_question_to_collection(req.cid, req.qid)
        .await?;
    publish_collection(&state, collection.clone());
    Ok(Json(collection))
}

pub async fn remove_question_from_collection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModifyCollectionRequest>,
) -> Result<Json<Collection>, ApiError> {
    let collection = state
        .store
        .remove_question_from_collection(req.cid, req.qid)
        .await?;
    publish_collection(&state, collection.clone());
    Ok(Json(collection))
}

#[derive(Debug, Deserialize)]
pub struct RenameCollectionRequest {
    pub cid: Uuid,
    #[serde(rename = "newName")]
    pub new_name: String,
}

pub async fn rename_collection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenameCollectionRequest>,
) -> Result<Json<Collection>, ApiError> {
    if req.new_name.is_empty() {
        return Err(ApiError::BadRequest(
            "Invalid new name for collection".to_string(),
        ));
    }

    let collection = state
        .store
        .rename_collection(req.cid, &req.new_name)
        .await?;
    publish_collection(&state, collection.clone());
    Ok(Json(collection))
}

#[derive(Debug, Deserialize)]
pub struct DeleteCollectionRequest {
    pub user: String,
}

/// Deletes a collection and answers with the owner's remaining collections,
/// so list pages refresh in one step instead of patching out a single item.
pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path(cid): Path<Uuid>,
    Json(req): Json<DeleteCollectionRequest>,
) -> Result<Json<Vec<Collection>>, ApiError> {
    if req.user.is_empty() {
        return Err(ApiError::BadRequest("Invalid username".to_string()));
    }

    let remaining = state.store.delete_collection(cid, &req.user).await?;
    state.hub.publish(
        Topic::Collections {
            user: req.user.clone(),
        },
        ServerEvent::CollectionListUpdate {
            collections: remaining.clone(),
        },
    );
    Ok(Json(remaining))
}

fn publish_collection(state: &AppState, collection: Collection) {
    state.hub.publish(
        Topic::Collections {
            user: collection.user.clone(),
        },
        ServerEvent::CollectionUpdate { collection },
    );
}
