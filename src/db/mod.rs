//! SQLite persistence for wallet registrations.
//!
//! This module provides:
//! - Database initialization and schema setup
//! - The `RegistrationStore` interface and its SQLite repository

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{Registration, RegistrationError, RegistrationStore, Repository};
