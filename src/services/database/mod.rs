// Database service module
// SQLite connection and schema for the local schedule store

mod connection;
pub mod migrations;
pub mod schema;

pub use connection::Database;
