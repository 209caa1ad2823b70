// Configuration caches
//
// One slot per scope. A slot is either `Stale` or `Fresh` with the last
// parsed document; refresh is the only way into `Fresh`, and any writer
// can push it back to `Stale` through `ConfigInvalidator`.

use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::document::{ConfigMap, Scope};

/// Anything that can mark a scope's cached configuration as out of date.
///
/// Every operation that changes configuration on the card calls this
/// after the change is accepted, so the next read refetches.
pub trait ConfigInvalidator: Send + Sync {
    fn invalidate(&self, scope: Scope);
}

/// Two-state cache value.
#[derive(Debug, Clone, Default)]
pub enum CacheState {
    #[default]
    Stale,
    Fresh(Arc<ConfigMap>),
}

impl CacheState {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

#[derive(Debug, Default)]
struct SlotState {
    cache: CacheState,
    /// Bumped by every invalidation; a refresh only lands if no
    /// invalidation happened while it was in flight.
    generation: u64,
}

/// Cache slot for one scope.
#[derive(Debug, Default)]
pub(crate) struct CacheSlot {
    state: Mutex<SlotState>,
    /// Serializes refreshes so concurrent cold reads fetch once.
    refresh: AsyncMutex<()>,
}

impl CacheSlot {
    pub(crate) fn refresh_lock(&self) -> &AsyncMutex<()> {
        &self.refresh
    }

    /// The cached map if fresh, plus the generation observed.
    pub(crate) fn snapshot(&self) -> (Option<Arc<ConfigMap>>, u64) {
        let state = self.state.lock().expect("cache lock poisoned");
        let data = match &state.cache {
            CacheState::Fresh(map) => Some(Arc::clone(map)),
            CacheState::Stale => None,
        };
        (data, state.generation)
    }

    /// Replace the whole cache with `map`, unless invalidated since
    /// `generation` was observed.
    pub(crate) fn store(&self, map: Arc<ConfigMap>, generation: u64) -> bool {
        let mut state = self.state.lock().expect("cache lock poisoned");
        if state.generation != generation {
            return false;
        }
        state.cache = CacheState::Fresh(map);
        true
    }

    pub(crate) fn invalidate(&self) {
        let mut state = self.state.lock().expect("cache lock poisoned");
        state.cache = CacheState::Stale;
        state.generation = state.generation.wrapping_add(1);
    }

    pub(crate) fn state(&self) -> CacheState {
        self.state.lock().expect("cache lock poisoned").cache.clone()
    }
}

/// The system and SNMP slots of one session.
#[derive(Debug, Default)]
pub(crate) struct ConfigCaches {
    system: CacheSlot,
    snmp: CacheSlot,
}

impl ConfigCaches {
    pub(crate) fn slot(&self, scope: Scope) -> &CacheSlot {
        match scope {
            Scope::System => &self.system,
            Scope::Snmp => &self.snmp,
        }
    }

    pub(crate) fn invalidate_all(&self) {
        for scope in Scope::ALL {
            self.slot(scope).invalidate();
        }
    }
}
