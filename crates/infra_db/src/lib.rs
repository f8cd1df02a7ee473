//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the lost-and-found service using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern:
//!
//! - `repositories` hold the SQL and row types for each table family
//! - `adapters` implement the domain ports on top of the repositories
//!
//! Claim writes that must stay consistent with their found item (new
//! claims, approvals, withdrawals) each run in a single transaction.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/lost_found")).await?;
//! run_migrations(&pool).await?;
//! let claims = PostgresClaimAdapter::new(pool.clone());
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{
    PostgresAuditLogAdapter, PostgresClaimAdapter, PostgresItemAdapter, PostgresProfileAdapter,
};
