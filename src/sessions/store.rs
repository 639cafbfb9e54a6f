use crate::prelude::*;

use tower_sessions::MokaStore;

/// In-memory session store. Games are lost when the process exits.
pub fn build(cfg: &Config) -> MokaStore {
    tracing::debug!(capacity = cfg.session_cache_capacity, "building session store");

    return MokaStore::new(Some(cfg.session_cache_capacity));
}
