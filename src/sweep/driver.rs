//! Periodic driver: runs one sweep pass per configured interval of host ticks.
//!
//! The host calls [`SweepDriver::on_tick`] once per game tick from its
//! serialized tick context; the driver owns the interval arithmetic. A pass
//! runs to completion synchronously, so passes can never overlap.

use std::sync::Arc;

use crate::core::config::SweepConfig;
use crate::host::api::Host;
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::sweep::SWEEP_CAPABILITY;
use crate::sweep::command::display_name;
use crate::sweep::registry::SweepRegistry;
use crate::sweep::scanner::sweep_around;

/// Drives the area scanner for every registered player.
pub struct SweepDriver {
    config: SweepConfig,
    registry: Arc<SweepRegistry>,
    logger: ActivityLoggerHandle,
    ticks_until_pass: u32,
}

impl SweepDriver {
    #[must_use]
    pub fn new(
        config: SweepConfig,
        registry: Arc<SweepRegistry>,
        logger: ActivityLoggerHandle,
    ) -> Self {
        let ticks_until_pass = config.scan_interval_ticks;
        Self {
            config,
            registry,
            logger,
            ticks_until_pass,
        }
    }

    /// Advance one host tick; runs a pass when the interval elapses.
    pub fn on_tick(&mut self, host: &dyn Host) {
        self.ticks_until_pass = self.ticks_until_pass.saturating_sub(1);
        if self.ticks_until_pass > 0 {
            return;
        }
        self.ticks_until_pass = self.config.scan_interval_ticks;
        self.run_pass(host);
    }

    /// One sweep pass over a snapshot of the registry.
    pub fn run_pass(&mut self, host: &dyn Host) {
        // Cheap no-op on idle servers before taking a snapshot.
        if self.registry.is_empty() {
            return;
        }

        for player in self.registry.snapshot() {
            // Offline players stay registered; they may reconnect and resume.
            if !host.is_online(player) {
                continue;
            }

            // Permission revoked since toggle-on: evict silently.
            if !host.has_permission(player, SWEEP_CAPABILITY) {
                self.registry.remove(player);
                self.logger.send(ActivityEvent::PlayerEvicted {
                    player: display_name(host, player),
                });
                continue;
            }

            let stats = sweep_around(host, &self.config, player);
            if self.config.log_stats && stats.cleared_total() > 0 {
                self.logger.send(ActivityEvent::SweepCompleted {
                    player: display_name(host, player),
                    containers: stats.containers,
                    item_displays: stats.item_displays,
                    entity_inventories: stats.entity_inventories,
                    chunks_visited: stats.chunks_visited,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::api::{ChunkPos, Inventory, ItemStack};
    use crate::host::sim::SimHost;

    fn stocked() -> Inventory {
        let mut inv = Inventory::with_capacity(27);
        inv.set_slot(0, ItemStack::new("cobblestone", 64));
        inv
    }

    fn driver_with_interval(interval: u32, registry: &Arc<SweepRegistry>) -> SweepDriver {
        let config = SweepConfig {
            scan_interval_ticks: interval,
            chunk_radius: 0,
            ..SweepConfig::default()
        };
        SweepDriver::new(
            config,
            Arc::clone(registry),
            ActivityLoggerHandle::disconnected(),
        )
    }

    #[test]
    fn pass_fires_only_on_interval_boundaries() {
        let host = SimHost::new();
        let pos = ChunkPos::new(0, 0);
        host.load_chunk(pos);
        let container = host.add_container(pos, stocked());
        let player = host.add_player("steve", pos, &[SWEEP_CAPABILITY]);

        let registry = Arc::new(SweepRegistry::new());
        registry.toggle(player);
        let mut driver = driver_with_interval(5, &registry);

        for _ in 0..4 {
            driver.on_tick(&host);
        }
        assert!(!host.block_entity_inventory(container).unwrap().is_empty());

        driver.on_tick(&host);
        assert!(host.block_entity_inventory(container).unwrap().is_empty());
    }

    #[test]
    fn offline_player_is_skipped_but_kept() {
        let host = SimHost::new();
        let pos = ChunkPos::new(0, 0);
        host.load_chunk(pos);
        host.add_container(pos, stocked());
        let player = host.add_player("steve", pos, &[SWEEP_CAPABILITY]);
        host.set_online(player, false);

        let registry = Arc::new(SweepRegistry::new());
        registry.toggle(player);
        let mut driver = driver_with_interval(1, &registry);

        driver.run_pass(&host);
        assert!(registry.is_enabled(player));
        assert_eq!(host.remaining_stocked_inventories(), 1);
    }

    #[test]
    fn unpermitted_player_is_evicted_in_one_pass() {
        let host = SimHost::new();
        let pos = ChunkPos::new(0, 0);
        host.load_chunk(pos);
        host.add_container(pos, stocked());
        let player = host.add_player("steve", pos, &[SWEEP_CAPABILITY]);

        let registry = Arc::new(SweepRegistry::new());
        registry.toggle(player);
        host.revoke_permission(player, SWEEP_CAPABILITY);

        let mut driver = driver_with_interval(1, &registry);
        driver.run_pass(&host);

        assert!(!registry.is_enabled(player));
        // Evicted before scanning: the container is untouched.
        assert_eq!(host.remaining_stocked_inventories(), 1);
    }

    #[test]
    fn empty_registry_pass_touches_nothing() {
        let host = SimHost::new();
        let pos = ChunkPos::new(0, 0);
        host.load_chunk(pos);
        host.add_container(pos, stocked());

        let registry = Arc::new(SweepRegistry::new());
        let mut driver = driver_with_interval(1, &registry);
        driver.run_pass(&host);
        assert_eq!(host.remaining_stocked_inventories(), 1);
    }

    #[test]
    fn multiple_players_are_swept_in_one_pass() {
        let host = SimHost::new();
        let near = ChunkPos::new(0, 0);
        let far = ChunkPos::new(100, 100);
        host.load_chunk(near);
        host.load_chunk(far);
        host.add_container(near, stocked());
        host.add_container(far, stocked());
        let a = host.add_player("steve", near, &[SWEEP_CAPABILITY]);
        let b = host.add_player("alex", far, &[SWEEP_CAPABILITY]);

        let registry = Arc::new(SweepRegistry::new());
        registry.toggle(a);
        registry.toggle(b);

        let mut driver = driver_with_interval(1, &registry);
        driver.run_pass(&host);
        assert_eq!(host.remaining_stocked_inventories(), 0);
    }
}
