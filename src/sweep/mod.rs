//! Cleanup-mode core: opt-in registry, toggle command, area scanner, driver.

pub mod command;
pub mod driver;
pub mod registry;
pub mod scanner;

/// Permission capability required to toggle and keep cleanup mode.
pub const SWEEP_CAPABILITY: &str = "chunksweeper.use";
