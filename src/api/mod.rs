//! HTTP batch prediction API.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;
