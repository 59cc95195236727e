// Database service module
// SQLite connection and schema management for the task table

mod connection;
mod migrations;
mod schema;

pub use connection::Database;
