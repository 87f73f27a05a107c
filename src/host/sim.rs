//! In-memory [`Host`] implementation for the simulation binary and tests.
//!
//! Interior mutability via `parking_lot::RwLock` so the trait's `&self`
//! mutators work from any context; the real engine serializes world mutation
//! on its tick thread, the double serializes with a lock.

#![allow(missing_docs)]

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::core::errors::{Result, SweepError};
use crate::host::api::{
    BlockEntityId, ChunkPos, EntityId, EntityKind, Host, Inventory, ItemStack, PlayerId,
};

#[derive(Debug)]
enum SimEntity {
    ItemDisplay {
        glowing: bool,
        held: Option<ItemStack>,
    },
    InventoryHolder {
        inventory: Inventory,
    },
    /// Classified as [`EntityKind::Other`]; must never be touched.
    Bystander,
}

#[derive(Debug)]
struct SimPlayer {
    name: String,
    online: bool,
    chunk: ChunkPos,
    permissions: HashSet<String>,
    messages: Vec<String>,
}

#[derive(Debug, Default)]
struct SimWorld {
    loaded: HashSet<ChunkPos>,
    block_entities: HashMap<ChunkPos, Vec<BlockEntityId>>,
    entities: HashMap<ChunkPos, Vec<EntityId>>,
    block_inventories: HashMap<BlockEntityId, Inventory>,
    entity_records: HashMap<EntityId, SimEntity>,
    players: HashMap<PlayerId, SimPlayer>,
    console_messages: Vec<String>,
    /// Chunks whose block-entity enumeration fails (host API variability).
    failing_chunks: HashSet<ChunkPos>,
    view_distance: i32,
    next_block_entity: u64,
    next_entity: u64,
    next_player: u64,
}

/// In-memory game world implementing [`Host`].
#[derive(Debug)]
pub struct SimHost {
    inner: RwLock<SimWorld>,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SimWorld {
                view_distance: 8,
                ..SimWorld::default()
            }),
        }
    }

    pub fn set_view_distance(&self, chunks: i32) {
        self.inner.write().view_distance = chunks;
    }

    // ──────────────────── world building ────────────────────

    pub fn load_chunk(&self, pos: ChunkPos) {
        self.inner.write().loaded.insert(pos);
    }

    pub fn unload_chunk(&self, pos: ChunkPos) {
        self.inner.write().loaded.remove(&pos);
    }

    /// Make block-entity enumeration fail for this chunk.
    pub fn fail_block_entities_in(&self, pos: ChunkPos) {
        self.inner.write().failing_chunks.insert(pos);
    }

    pub fn add_container(&self, pos: ChunkPos, inventory: Inventory) -> BlockEntityId {
        let mut world = self.inner.write();
        let id = BlockEntityId(world.next_block_entity);
        world.next_block_entity += 1;
        world.block_entities.entry(pos).or_default().push(id);
        world.block_inventories.insert(id, inventory);
        id
    }

    /// Block entity with persistent state but no inventory (e.g. a sign).
    pub fn add_plain_block_entity(&self, pos: ChunkPos) -> BlockEntityId {
        let mut world = self.inner.write();
        let id = BlockEntityId(world.next_block_entity);
        world.next_block_entity += 1;
        world.block_entities.entry(pos).or_default().push(id);
        id
    }

    pub fn add_item_display(
        &self,
        pos: ChunkPos,
        glowing: bool,
        held: Option<ItemStack>,
    ) -> EntityId {
        self.add_entity(pos, SimEntity::ItemDisplay { glowing, held })
    }

    pub fn add_inventory_holder(&self, pos: ChunkPos, inventory: Inventory) -> EntityId {
        self.add_entity(pos, SimEntity::InventoryHolder { inventory })
    }

    pub fn add_bystander(&self, pos: ChunkPos) -> EntityId {
        self.add_entity(pos, SimEntity::Bystander)
    }

    fn add_entity(&self, pos: ChunkPos, record: SimEntity) -> EntityId {
        let mut world = self.inner.write();
        let id = EntityId(world.next_entity);
        world.next_entity += 1;
        world.entities.entry(pos).or_default().push(id);
        world.entity_records.insert(id, record);
        id
    }

    // ──────────────────── player building ────────────────────

    pub fn add_player(
        &self,
        name: impl Into<String>,
        chunk: ChunkPos,
        permissions: &[&str],
    ) -> PlayerId {
        let mut world = self.inner.write();
        let id = PlayerId(world.next_player);
        world.next_player += 1;
        world.players.insert(
            id,
            SimPlayer {
                name: name.into(),
                online: true,
                chunk,
                permissions: permissions.iter().map(ToString::to_string).collect(),
                messages: Vec::new(),
            },
        );
        id
    }

    pub fn set_online(&self, player: PlayerId, online: bool) {
        if let Some(p) = self.inner.write().players.get_mut(&player) {
            p.online = online;
        }
    }

    pub fn move_player(&self, player: PlayerId, chunk: ChunkPos) {
        if let Some(p) = self.inner.write().players.get_mut(&player) {
            p.chunk = chunk;
        }
    }

    pub fn revoke_permission(&self, player: PlayerId, capability: &str) {
        if let Some(p) = self.inner.write().players.get_mut(&player) {
            p.permissions.remove(capability);
        }
    }

    pub fn grant_permission(&self, player: PlayerId, capability: &str) {
        if let Some(p) = self.inner.write().players.get_mut(&player) {
            p.permissions.insert(capability.to_string());
        }
    }

    // ──────────────────── assertions / inspection ────────────────────

    pub fn messages_for(&self, player: PlayerId) -> Vec<String> {
        self.inner
            .read()
            .players
            .get(&player)
            .map(|p| p.messages.clone())
            .unwrap_or_default()
    }

    pub fn console_messages(&self) -> Vec<String> {
        self.inner.read().console_messages.clone()
    }

    /// Count of non-empty inventories left anywhere in the world, block and
    /// entity side combined.
    pub fn remaining_stocked_inventories(&self) -> usize {
        let world = self.inner.read();
        let blocks = world
            .block_inventories
            .values()
            .filter(|inv| !inv.is_empty())
            .count();
        let entities = world
            .entity_records
            .values()
            .filter(|record| match record {
                SimEntity::InventoryHolder { inventory } => !inventory.is_empty(),
                SimEntity::ItemDisplay { .. } | SimEntity::Bystander => false,
            })
            .count();
        blocks + entities
    }
}

impl Host for SimHost {
    fn is_chunk_loaded(&self, pos: ChunkPos) -> bool {
        self.inner.read().loaded.contains(&pos)
    }

    fn block_entities(&self, pos: ChunkPos) -> Result<Vec<BlockEntityId>> {
        let world = self.inner.read();
        if world.failing_chunks.contains(&pos) {
            return Err(SweepError::HostQuery {
                chunk_x: pos.x,
                chunk_z: pos.z,
                details: "block entity enumeration unsupported".to_string(),
            });
        }
        Ok(world.block_entities.get(&pos).cloned().unwrap_or_default())
    }

    fn entities(&self, pos: ChunkPos) -> Vec<EntityId> {
        self.inner
            .read()
            .entities
            .get(&pos)
            .cloned()
            .unwrap_or_default()
    }

    fn block_entity_inventory(&self, id: BlockEntityId) -> Option<Inventory> {
        self.inner.read().block_inventories.get(&id).cloned()
    }

    fn clear_block_entity_inventory(&self, id: BlockEntityId) {
        if let Some(inv) = self.inner.write().block_inventories.get_mut(&id) {
            inv.clear();
        }
    }

    fn classify_entity(&self, id: EntityId) -> EntityKind {
        match self.inner.read().entity_records.get(&id) {
            Some(SimEntity::ItemDisplay { glowing, .. }) => {
                EntityKind::ItemDisplay { glowing: *glowing }
            }
            Some(SimEntity::InventoryHolder { .. }) => EntityKind::InventoryHolder,
            Some(SimEntity::Bystander) | None => EntityKind::Other,
        }
    }

    fn displayed_item(&self, id: EntityId) -> Option<ItemStack> {
        match self.inner.read().entity_records.get(&id) {
            Some(SimEntity::ItemDisplay { held, .. }) => held.clone(),
            _ => None,
        }
    }

    fn clear_displayed_item(&self, id: EntityId) {
        if let Some(SimEntity::ItemDisplay { held, .. }) =
            self.inner.write().entity_records.get_mut(&id)
        {
            *held = None;
        }
    }

    fn entity_inventory(&self, id: EntityId) -> Option<Inventory> {
        match self.inner.read().entity_records.get(&id) {
            Some(SimEntity::InventoryHolder { inventory }) => Some(inventory.clone()),
            _ => None,
        }
    }

    fn clear_entity_inventory(&self, id: EntityId) {
        if let Some(SimEntity::InventoryHolder { inventory }) =
            self.inner.write().entity_records.get_mut(&id)
        {
            inventory.clear();
        }
    }

    fn is_online(&self, player: PlayerId) -> bool {
        self.inner
            .read()
            .players
            .get(&player)
            .is_some_and(|p| p.online)
    }

    fn player_chunk(&self, player: PlayerId) -> Option<ChunkPos> {
        let world = self.inner.read();
        let p = world.players.get(&player)?;
        p.online.then_some(p.chunk)
    }

    fn player_name(&self, player: PlayerId) -> Option<String> {
        self.inner
            .read()
            .players
            .get(&player)
            .map(|p| p.name.clone())
    }

    fn has_permission(&self, player: PlayerId, capability: &str) -> bool {
        self.inner
            .read()
            .players
            .get(&player)
            .is_some_and(|p| p.permissions.contains(capability))
    }

    fn send_message(&self, player: PlayerId, message: &str) {
        if let Some(p) = self.inner.write().players.get_mut(&player) {
            p.messages.push(message.to_string());
        }
    }

    fn console_message(&self, message: &str) {
        self.inner.write().console_messages.push(message.to_string());
    }

    fn view_distance(&self) -> i32 {
        self.inner.read().view_distance
    }
}
