use std::sync::Arc;

use crate::auth::SessionManager;
use crate::database::Store;

/// Shared per-process state handed to every handler and to the access middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: SessionManager) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
