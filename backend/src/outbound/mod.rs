//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL user store (Diesel)
//! - **memory**: in-process user store for development and tests
//! - **auth**: static bearer tokens and the owner-only rule
//! - **notify**: event channel and a log-only mailer
//!
//! Adapters translate between domain types and infrastructure; they hold no
//! account rules.

pub mod auth;
pub mod memory;
pub mod notify;
pub mod persistence;
