//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::{auth::token::TokenService, store::AccountStore};

/// Per-process state. Cloned into each request; both members are read-only
/// after startup apart from the store's own interior state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenService) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }
}
