//! Data models representing stored entities and API payloads.

/// Customer account model
pub mod account;
/// Fund transfer request
pub mod transfer;
