//! Opt-in registry: the set of players currently in cleanup mode.
//!
//! Mutated from the command context, iterated from the tick context, so the
//! set lives behind a `parking_lot::RwLock`. No ordering guarantee across
//! entries. The set is process-lifetime only; losing it on restart is by
//! contract (re-opting-in is one command).

use std::collections::HashSet;

use parking_lot::RwLock;

use crate::host::api::PlayerId;

/// Concurrency-safe set of players in cleanup mode.
#[derive(Debug, Default)]
pub struct SweepRegistry {
    players: RwLock<HashSet<PlayerId>>,
}

impl SweepRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership. Returns `true` if the player is now enabled.
    pub fn toggle(&self, player: PlayerId) -> bool {
        let mut players = self.players.write();
        if players.remove(&player) {
            false
        } else {
            players.insert(player);
            true
        }
    }

    #[must_use]
    pub fn is_enabled(&self, player: PlayerId) -> bool {
        self.players.read().contains(&player)
    }

    /// Remove a player (permission loss during a pass). Returns `true` if the
    /// player was present.
    pub fn remove(&self, player: PlayerId) -> bool {
        self.players.write().remove(&player)
    }

    /// Drop every entry (shutdown hook).
    pub fn clear(&self) {
        self.players.write().clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.read().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.read().len()
    }

    /// Point-in-time copy for iteration outside the lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PlayerId> {
        self.players.read().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let registry = SweepRegistry::new();
        let p = PlayerId(1);
        assert!(!registry.is_enabled(p));
        assert!(registry.toggle(p));
        assert!(registry.is_enabled(p));
        assert!(!registry.toggle(p));
        assert!(!registry.is_enabled(p));
    }

    #[test]
    fn remove_reports_presence() {
        let registry = SweepRegistry::new();
        let p = PlayerId(7);
        assert!(!registry.remove(p));
        registry.toggle(p);
        assert!(registry.remove(p));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let registry = SweepRegistry::new();
        for id in 0..5 {
            registry.toggle(PlayerId(id));
        }
        assert_eq!(registry.len(), 5);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let registry = SweepRegistry::new();
        registry.toggle(PlayerId(1));
        let snap = registry.snapshot();
        registry.toggle(PlayerId(2));
        assert_eq!(snap, vec![PlayerId(1)]);
    }

    #[test]
    fn concurrent_toggles_do_not_lose_entries() {
        let registry = std::sync::Arc::new(SweepRegistry::new());
        let handles: Vec<_> = (0..8u64)
            .map(|id| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.toggle(PlayerId(id));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(registry.len(), 8);
    }

    proptest! {
        /// Membership after any toggle sequence equals the per-player toggle parity.
        #[test]
        fn membership_equals_toggle_parity(toggles in proptest::collection::vec(0..16u64, 0..64)) {
            let registry = SweepRegistry::new();
            let mut counts = std::collections::HashMap::new();
            for id in &toggles {
                registry.toggle(PlayerId(*id));
                *counts.entry(*id).or_insert(0u32) += 1;
            }
            for (id, count) in counts {
                prop_assert_eq!(registry.is_enabled(PlayerId(id)), count % 2 == 1);
            }
        }
    }
}
