//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They talk to the account store and enforce the account and transfer rules.

pub mod account_service;
pub mod transfer_service;
