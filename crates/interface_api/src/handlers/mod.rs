//! Request handlers, one module per resource

pub mod health;
pub mod me;
pub mod items;
pub mod claims;
pub mod admin;
