//! Request middleware.
//!
//! Purpose: define middleware for request lifecycle concerns. Authentication
//! lives with the HTTP adapter in [`crate::inbound::http::caller`].

pub mod trace;

pub use trace::Trace;
