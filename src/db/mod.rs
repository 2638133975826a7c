//! Database module for the SQLite output file.
//!
//! This module provides:
//! - Template provisioning (copying the schema-only file into place)
//! - Connection setup and SQLite pragma configuration
//! - The content schema and schema-only template creation
//! - Repository layer for inserts and post-load checks

pub mod connection;
pub mod provision;
pub mod repo;
pub mod schema;

pub use connection::open_database;
pub use provision::{provision_template, ProvisionError};
pub use repo::{Persist, Repository};
pub use schema::{create_template, CONTENT_TABLES};
