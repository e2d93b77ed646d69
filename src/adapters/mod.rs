//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session token validation (Supabase, local JWT, mock)
//! - `http` - axum routes, middleware and error mapping
//! - `memory` - In-memory profile store
//! - `postgres` - Profile store on PostgreSQL
//! - `steam` - Steam OpenID assertion verification
//! - `stripe` - Stripe customer lookup and billing portal

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod steam;
pub mod stripe;
