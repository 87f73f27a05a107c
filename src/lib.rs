#![forbid(unsafe_code)]

//! Chunk Sweeper (csw) — opt-in cleanup mode for voxel-game servers.
//!
//! Admins toggle cleanup mode on themselves; a periodic driver then scans the
//! chunk square around each registered admin and empties:
//! 1. **Containers** — chests, barrels, any inventory-carrying block entity
//! 2. **Item displays** — item frames and their glowing variant
//! 3. **Inventory-holder entities** — storage carts and similar
//!
//! The host game engine is abstracted behind the [`host::api::Host`] trait;
//! [`host::sim::SimHost`] is a complete in-memory double for tests and the
//! bundled simulation CLI.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use chunk_sweeper::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use chunk_sweeper::core::config::Config;
//! use chunk_sweeper::sweep::scanner::sweep_around;
//! ```

pub mod prelude;

pub mod core;
pub mod host;
pub mod logger;
pub mod service;
pub mod sweep;
