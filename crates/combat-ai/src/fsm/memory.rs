//! Persistent per-fighter controller memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::StateId;
use crate::snapshot::AgentId;

/// What the controller remembers about one fighter between calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AgentMemory {
    pub current_state: StateId,
    /// Ticks left of committed COMBAT dwell.
    pub combat_timer: u32,
    /// Ticks left of committed FLEE.
    pub flee_timer: u32,
}

/// Memory for every fighter seen so far, keyed by agent id.
///
/// Entries are created on first use and live until [`MemoryStore::forget`]
/// is called. Each entry has its own lock, so calls for different fighters
/// only contend briefly on the map itself.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<AgentId, Arc<Mutex<AgentMemory>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `id`, inserting the initial memory if absent.
    pub fn entry(&self, id: &AgentId) -> Arc<Mutex<AgentMemory>> {
        let mut entries = lock(&self.entries);
        if let Some(existing) = entries.get(id) {
            return Arc::clone(existing);
        }
        tracing::trace!(agent = %id, "creating controller memory");
        let created = Arc::new(Mutex::new(AgentMemory::default()));
        entries.insert(id.clone(), Arc::clone(&created));
        created
    }

    /// Runs `f` with exclusive access to the memory of `id`.
    pub fn with<R>(&self, id: &AgentId, f: impl FnOnce(&mut AgentMemory) -> R) -> R {
        let entry = self.entry(id);
        let mut memory = lock(&entry);
        f(&mut memory)
    }

    /// Copy of the current memory of `id`, without creating an entry.
    pub fn get(&self, id: &AgentId) -> Option<AgentMemory> {
        let entry = lock(&self.entries).get(id).map(Arc::clone)?;
        let memory = *lock(&entry);
        Some(memory)
    }

    /// Drops the memory of `id`, e.g. when the fighter leaves the arena.
    pub fn forget(&self, id: &AgentId) -> Option<AgentMemory> {
        let entry = lock(&self.entries).remove(id)?;
        let memory = *lock(&entry);
        Some(memory)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locks `mutex`, taking over the guard if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
