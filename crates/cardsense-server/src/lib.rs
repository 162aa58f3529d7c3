//! CardSense HTTP server — exposes the recommendation engine to the card builder.

pub mod routes;
pub mod state;
pub mod usage;

pub use routes::build_router;
pub use state::AppState;
