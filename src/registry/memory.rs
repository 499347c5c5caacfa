use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// The lock-ownership table: lock name to owning client id.
///
/// Absence of a key means the lock is free. All read-modify-write operations
/// go through `DashMap`'s entry API, so two mutations of the same lock name
/// cannot interleave. One instance lives for the node's process lifetime;
/// nothing is persisted.
pub struct LockRegistry {
    locks: DashMap<String, String>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Atomically acquires `lock_name` for `client_id` if nobody owns it.
    ///
    /// Returns `false` (state unchanged) when the lock is already held,
    /// including when it is already held by the same client.
    pub fn preempt(&self, lock_name: &str, client_id: &str) -> bool {
        match self.locks.entry(lock_name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(client_id.to_string());
                true
            }
        }
    }

    /// Atomically removes `lock_name` if `client_id` is the recorded owner.
    ///
    /// Never clears a lock owned by another client.
    pub fn release(&self, lock_name: &str, client_id: &str) -> bool {
        self.locks
            .remove_if(lock_name, |_, owner| owner == client_id)
            .is_some()
    }

    /// Reads the current owner. Pure; never fails.
    pub fn check(&self, lock_name: &str) -> Option<String> {
        self.locks.get(lock_name).map(|entry| entry.value().clone())
    }

    /// Applies an ownership decision without validation: sets the owner, or
    /// clears the lock when `owner` is `None`.
    ///
    /// This is how replication notifications land on a follower.
    pub fn apply_update(&self, lock_name: &str, owner: Option<&str>) {
        match owner {
            Some(client_id) => {
                self.locks
                    .insert(lock_name.to_string(), client_id.to_string());
            }
            None => {
                self.locks.remove(lock_name);
            }
        }
    }

    /// Number of currently held locks.
    pub fn held_count(&self) -> usize {
        self.locks.len()
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
