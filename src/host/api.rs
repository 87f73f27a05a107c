//! Host-engine collaborator surface.
//!
//! The game engine (chunk loading, entity storage, permissions, messaging) is
//! an external service. Everything the sweeper needs from it goes through the
//! [`Host`] trait so the core stays testable against an in-memory double.

#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Opaque player identifier. The host owns the mapping to engine-native IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Horizontal chunk coordinates — the unit of load/unload and iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk at `(x + dx, z + dz)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Item type. `Void` is the engine's "no item" sentinel (air and friends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Void,
    Item(String),
}

impl ItemKind {
    /// Whether this kind is a real, obtainable item rather than a sentinel.
    #[must_use]
    pub const fn is_real_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }
}

/// A stack of items in one inventory slot.
///
/// `count` is signed so the engine's zero/negative-quantity edge cases stay
/// representable; such stacks count as unoccupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: i32,
}

impl ItemStack {
    #[must_use]
    pub fn new(name: impl Into<String>, count: i32) -> Self {
        Self {
            kind: ItemKind::Item(name.into()),
            count,
        }
    }

    /// A stack of the void sentinel kind.
    #[must_use]
    pub const fn void() -> Self {
        Self {
            kind: ItemKind::Void,
            count: 0,
        }
    }

    /// Whether this stack occupies its slot: real kind and positive quantity.
    #[must_use]
    pub const fn occupies_slot(&self) -> bool {
        self.kind.is_real_item() && self.count > 0
    }
}

/// Fixed-slot inventory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Inventory with `capacity` empty slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    #[must_use]
    pub fn from_slots(slots: Vec<Option<ItemStack>>) -> Self {
        Self { slots }
    }

    pub fn set_slot(&mut self, index: usize, stack: ItemStack) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(stack);
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Emptiness test shared by every clearing site: an inventory is empty iff
    /// every slot is absent, void-kind, or holds a non-positive quantity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.as_ref().is_none_or(|stack| !stack.occupies_slot()))
    }

    /// Remove every stack. `clear` followed by [`Inventory::is_empty`] is
    /// always true.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

/// An absent inventory counts as empty (e.g. a holder that never allocated one).
#[must_use]
pub fn inventory_is_empty(inventory: Option<&Inventory>) -> bool {
    inventory.is_none_or(Inventory::is_empty)
}

/// Handle to a world-embedded structure with persistent state (container,
/// furnace, ...), enumerable per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockEntityId(pub u64);

/// Handle to a live game entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Closed classification of entities the sweeper cares about.
///
/// Classification happens exactly once per entity, so an entity can never be
/// processed under more than one category; item displays win over inventory
/// holders even on a host where one entity satisfies both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Mounted display entity that visually holds one item (glowing variant
    /// included).
    ItemDisplay { glowing: bool },
    /// Entity exposing a cargo inventory (storage carts and the like).
    InventoryHolder,
    /// Everything else; never touched.
    Other,
}

/// Everything the sweeper consumes from the game engine.
///
/// World mutation methods are called exclusively from the host's tick context,
/// which the engine guarantees is serialized; the trait therefore takes
/// `&self` and leaves synchronization to the implementor.
pub trait Host: Send + Sync {
    // ──────────────────── world ────────────────────

    fn is_chunk_loaded(&self, pos: ChunkPos) -> bool;

    /// Enumerate block entities in a loaded chunk.
    ///
    /// Fallible by design: hosts without block-entity enumeration return an
    /// error and the scanner degrades to "nothing found" for that chunk.
    fn block_entities(&self, pos: ChunkPos) -> Result<Vec<BlockEntityId>>;

    /// Enumerate live entities currently present in a loaded chunk.
    fn entities(&self, pos: ChunkPos) -> Vec<EntityId>;

    /// Snapshot of a block entity's inventory, if it has one.
    fn block_entity_inventory(&self, id: BlockEntityId) -> Option<Inventory>;

    fn clear_block_entity_inventory(&self, id: BlockEntityId);

    fn classify_entity(&self, id: EntityId) -> EntityKind;

    /// The item shown by an item-display entity, if any.
    fn displayed_item(&self, id: EntityId) -> Option<ItemStack>;

    fn clear_displayed_item(&self, id: EntityId);

    /// Snapshot of an inventory-holder entity's cargo, if it has one.
    fn entity_inventory(&self, id: EntityId) -> Option<Inventory>;

    fn clear_entity_inventory(&self, id: EntityId);

    // ──────────────────── players ────────────────────

    fn is_online(&self, player: PlayerId) -> bool;

    /// The chunk the player currently stands in; `None` while offline.
    fn player_chunk(&self, player: PlayerId) -> Option<ChunkPos>;

    fn player_name(&self, player: PlayerId) -> Option<String>;

    fn has_permission(&self, player: PlayerId, capability: &str) -> bool;

    fn send_message(&self, player: PlayerId, message: &str);

    /// Message sink for non-player command senders.
    fn console_message(&self, message: &str);

    // ──────────────────── server ────────────────────

    /// Server-wide default view distance in chunks. May be negative on hosts
    /// that never report one; callers fall back to a hardcoded radius.
    fn view_distance(&self) -> i32;
}
