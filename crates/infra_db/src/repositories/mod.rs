//! Repository implementations for persisted entities
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. Queries are checked at runtime (`query_as` + `FromRow`, and
//! `QueryBuilder` for filtered listings), so the workspace builds without a
//! live database.

pub mod items;
pub mod claims;
pub mod profiles;

pub use items::{ItemRepository, ItemTable, UpdateOutcome};
pub use claims::ClaimsRepository;
pub use profiles::{AuditLogRepository, ProfileRepository};

/// Escapes LIKE metacharacters so user input matches literally
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
