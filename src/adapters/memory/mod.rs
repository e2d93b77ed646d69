//! In-memory adapters for tests and local development.

mod user_store;

pub use user_store::InMemoryUserStore;
