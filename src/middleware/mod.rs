//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can short-circuit requests (reject unauthorized callers) or attach
//! context for the handler to use.

/// Token-based account ownership guard
pub mod auth;
