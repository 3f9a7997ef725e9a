pub mod collections;
pub mod hub;
pub mod protocol;
pub mod questions;
pub mod rooms;
pub mod state;
pub mod users;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that builds the web server router.
pub use hub::EventHub;
pub use ws_handler::ws_handler;
