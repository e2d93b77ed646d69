//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserStore` - Steam and donor columns of the `profiles` table

mod user_store;

pub use user_store::PostgresUserStore;
