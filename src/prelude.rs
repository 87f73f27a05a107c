//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use chunk_sweeper::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SweepError};

// Host
pub use crate::host::api::{
    ChunkPos, EntityKind, Host, Inventory, ItemKind, ItemStack, PlayerId,
};
pub use crate::host::sim::SimHost;

// Sweep
pub use crate::sweep::SWEEP_CAPABILITY;
pub use crate::sweep::command::{CommandSender, handle_toggle};
pub use crate::sweep::driver::SweepDriver;
pub use crate::sweep::registry::SweepRegistry;
pub use crate::sweep::scanner::{SweepStats, sweep_around};

// Logger
pub use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle, spawn_logger};

// Service
pub use crate::service::SweepService;
