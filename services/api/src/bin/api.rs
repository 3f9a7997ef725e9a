//! services/api/src/bin/api.rs

use std::sync::Arc;

use api_lib::{
    adapters::PgStore,
    config::Config,
    error::ApiError,
    web::{collections, hub::EventHub, questions, rooms, state::AppState, users, ws_handler},
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgStore::new(db_pool));
    info!("Running database migrations...");
    store
        .run_migrations()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!("Database migrations complete.");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        hub: EventHub::new(config.event_capacity),
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {e}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .route("/question/getQuestion", get(questions::get_questions))
        .route(
            "/question/getQuestionById/{qid}",
            get(questions::get_question_by_id),
        )
        .route("/question/addQuestion", post(questions::add_question))
        .route("/question/upvoteQuestion", post(questions::upvote_question))
        .route(
            "/question/downvoteQuestion",
            post(questions::downvote_question),
        )
        .route("/answer/addAnswer", post(questions::add_answer))
        .route("/comment/addComment", post(questions::add_comment))
        .route("/room/getRoom", get(rooms::get_rooms))
        .route("/room/getRoomById/{rid}", get(rooms::get_room_by_id))
        .route("/room/addRoom", post(rooms::add_room))
        .route("/room/addUserToRoom", post(rooms::add_user_to_room))
        .route("/chat/addChat", post(rooms::add_chat))
        .route("/collection/getCollection", get(collections::get_collections))
        .route(
            "/collection/getCollectionById/{cid}",
            get(collections::get_collection_by_id),
        )
        .route("/collection/addCollection", post(collections::add_collection))
        .route(
            "/collection/addQuestionToCollection",
            post(collections::add_question_to_collection),
        )
        .route(
            "/collection/removeQuestionFromCollection",
            post(collections::remove_question_from_collection),
        )
        .route(
            "/collection/renameCollection",
            post(collections::rename_collection),
        )
        .route(
            "/collection/deleteCollection/{cid}",
            post(collections::delete_collection),
        )
        .route("/user/getUser", get(users::get_user))
        .route("/user/addUser", post(users::add_user))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
