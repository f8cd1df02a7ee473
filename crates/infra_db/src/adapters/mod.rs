//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports. Each adapter wraps a
//! repository and translates rows and database errors into domain types.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimAdapter;
//! use domain_claims::ClaimPort;
//!
//! let adapter = PostgresClaimAdapter::new(pool);
//! let claim = adapter.get(claim_id).await?;
//! ```

pub mod items;
pub mod claims;
pub mod admin;

pub use items::PostgresItemAdapter;
pub use claims::PostgresClaimAdapter;
pub use admin::{PostgresAuditLogAdapter, PostgresProfileAdapter};
