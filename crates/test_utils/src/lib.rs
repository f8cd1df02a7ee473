//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! lost-and-found test suite.
//!
//! # Modules
//!
//! - `fixtures`: Generated test data for reports, claims and profiles
//! - `builders`: Builder patterns for test data construction
//! - `backend`: In-memory wiring of every domain port
//! - `database`: PostgreSQL container management for integration tests
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod backend;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use backend::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
