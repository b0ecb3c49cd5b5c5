use tokio::sync::RwLock;

use crate::dto::snapshot::PlayerSnapshot;

/// Last known player state, served when a fresh status read doesn't finish in time.
#[derive(Debug, Default)]
pub(crate) struct StateCache {
    snapshot: RwLock<PlayerSnapshot>,
}

impl StateCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn update(&self, newer: &PlayerSnapshot) {
        self.snapshot.write().await.merge_from(newer);
    }

    pub(crate) async fn get(&self) -> PlayerSnapshot {
        self.snapshot.read().await.clone()
    }
}

#[cfg(test)]
#[path = "./state_cache_test.rs"]
mod state_cache_test;
