//! Helpers for integration tests that run against a live MySQL server.

pub mod mysql;

pub use mysql::{create_mysql_config, MySQLConfig};
