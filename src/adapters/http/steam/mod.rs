//! HTTP adapter for Steam account linking.
//!
//! - `GET /api/steam/auth` - Redirect to Steam, or handle Steam's callback

mod handlers;
mod routes;

pub use routes::steam_routes;
