//! `PostgreSQL` adapter for task records and runtime settings.

mod models;
mod schema;
mod store;

pub use store::PostgresTaskStore;
