//! Area scanner: visit the chunk square around a player and empty what it finds.

use crate::core::config::SweepConfig;
use crate::host::api::{ChunkPos, EntityKind, Host, PlayerId, inventory_is_empty};

/// Radius used when neither the config nor the server report a usable one.
pub const FALLBACK_RADIUS: i32 = 10;

/// Counters for one scan invocation. Ephemeral; discarded after logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Block-entity inventories cleared (one per structure, not per stack).
    pub containers: u64,
    /// Item displays whose shown item was removed.
    pub item_displays: u64,
    /// Inventory-holder entities whose cargo was cleared.
    pub entity_inventories: u64,
    /// Loaded chunks actually visited.
    pub chunks_visited: u32,
    /// Candidate chunks skipped because they were not loaded.
    pub chunks_skipped: u32,
}

impl SweepStats {
    /// Sum of the three clearing counters; the log-or-not decision.
    #[must_use]
    pub const fn cleared_total(&self) -> u64 {
        self.containers + self.item_displays + self.entity_inventories
    }
}

/// Resolve the configured radius against the server's view distance.
///
/// Negative configured radius delegates to the view distance; a view distance
/// that is itself negative falls back to [`FALLBACK_RADIUS`].
#[must_use]
pub const fn effective_radius(configured: i32, view_distance: i32) -> i32 {
    let radius = if configured < 0 {
        view_distance
    } else {
        configured
    };
    if radius < 0 { FALLBACK_RADIUS } else { radius }
}

/// The full `(2r+1)²` candidate grid centered on `center`, before the
/// loaded-chunk filter.
pub fn candidate_cells(center: ChunkPos, radius: i32) -> impl Iterator<Item = ChunkPos> {
    (-radius..=radius)
        .flat_map(move |dx| (-radius..=radius).map(move |dz| center.offset(dx, dz)))
}

/// Scan the loaded chunks around `player` and clear non-empty inventories.
///
/// Never force-loads a chunk and never propagates host query faults: a failed
/// block-entity enumeration degrades to an empty set for that chunk.
pub fn sweep_around(host: &dyn Host, config: &SweepConfig, player: PlayerId) -> SweepStats {
    let mut stats = SweepStats::default();

    let Some(center) = host.player_chunk(player) else {
        return stats;
    };
    let radius = effective_radius(config.chunk_radius, host.view_distance());

    for pos in candidate_cells(center, radius) {
        if !host.is_chunk_loaded(pos) {
            stats.chunks_skipped += 1;
            continue;
        }
        stats.chunks_visited += 1;
        sweep_chunk(host, config, pos, &mut stats);
    }

    stats
}

fn sweep_chunk(host: &dyn Host, config: &SweepConfig, pos: ChunkPos, stats: &mut SweepStats) {
    // Host API variability, not a scanner bug: degrade to "nothing found".
    let block_entities = host.block_entities(pos).unwrap_or_default();
    for id in block_entities {
        let inventory = host.block_entity_inventory(id);
        if !inventory_is_empty(inventory.as_ref()) {
            host.clear_block_entity_inventory(id);
            stats.containers += 1;
        }
    }

    for id in host.entities(pos) {
        // Classification is exclusive: an entity is processed as at most one
        // category, displays before inventory holders.
        match host.classify_entity(id) {
            EntityKind::ItemDisplay { .. } => {
                if config.clear_item_frames
                    && host
                        .displayed_item(id)
                        .is_some_and(|stack| stack.kind.is_real_item())
                {
                    host.clear_displayed_item(id);
                    stats.item_displays += 1;
                }
            }
            EntityKind::InventoryHolder => {
                if config.clear_inventory_holder_entities {
                    let inventory = host.entity_inventory(id);
                    if !inventory_is_empty(inventory.as_ref()) {
                        host.clear_entity_inventory(id);
                        stats.entity_inventories += 1;
                    }
                }
            }
            EntityKind::Other => {}
        }
    }
}
