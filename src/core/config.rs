//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};

/// Hard lower bound for the sweep interval, matching the host tick model.
pub const MIN_SCAN_INTERVAL_TICKS: u32 = 1;

/// Full chunk_sweeper configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
#[derive(Default)]
pub struct Config {
    pub sweep: SweepConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Sweep behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SweepConfig {
    /// Host ticks between sweep passes. Normalized to >= 1 on load.
    pub scan_interval_ticks: u32,
    /// Half-width of the scanned chunk square. -1 delegates to the server's
    /// view distance.
    pub chunk_radius: i32,
    /// Empty item displays (item frames and their glowing variant).
    pub clear_item_frames: bool,
    /// Empty inventory-carrying entities (storage carts and the like).
    pub clear_inventory_holder_entities: bool,
    /// Emit a summary activity event after each sweep that cleared anything.
    pub log_stats: bool,
}

/// Activity-log tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Bounded channel capacity between game threads and the logger thread.
    pub channel_capacity: usize,
    /// Maximum JSONL file size before rotation (bytes).
    pub max_size_bytes: u64,
    /// Number of rotated files to keep.
    pub max_rotated_files: u32,
}

/// Filesystem paths used by chunk_sweeper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scan_interval_ticks: 20,
            chunk_radius: -1,
            clear_item_frames: true,
            clear_inventory_holder_entities: true,
            log_stats: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            max_size_bytes: 50 * 1024 * 1024,
            max_rotated_files: 5,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[CSW-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir.join(".config").join("csw").join("config.toml");
        let data = home_dir.join(".local").join("share").join("csw");
        Self {
            config_file: cfg,
            jsonl_log: data.join("activity.jsonl"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path;
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SweepError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(SweepError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// Uses FNV-1a for cross-process-stable hashing (no `DefaultHasher`
    /// whose seed may vary across Rust releases).
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(&env_var)
    }

    /// Apply `CSW_*` overrides from an arbitrary lookup. The process
    /// environment is one such lookup; tests inject their own because
    /// mutating the real environment is unsafe under edition 2024.
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        // sweep
        set_u32(
            lookup,
            "CSW_SCAN_INTERVAL_TICKS",
            &mut self.sweep.scan_interval_ticks,
        )?;
        set_i32(lookup, "CSW_CHUNK_RADIUS", &mut self.sweep.chunk_radius)?;
        set_bool(
            lookup,
            "CSW_CLEAR_ITEM_FRAMES",
            &mut self.sweep.clear_item_frames,
        )?;
        set_bool(
            lookup,
            "CSW_CLEAR_INVENTORY_HOLDER_ENTITIES",
            &mut self.sweep.clear_inventory_holder_entities,
        )?;
        set_bool(lookup, "CSW_LOG_STATS", &mut self.sweep.log_stats)?;

        // logging
        set_usize(
            lookup,
            "CSW_LOGGING_CHANNEL_CAPACITY",
            &mut self.logging.channel_capacity,
        )?;
        set_u64(
            lookup,
            "CSW_LOGGING_MAX_SIZE_BYTES",
            &mut self.logging.max_size_bytes,
        )?;
        set_u32(
            lookup,
            "CSW_LOGGING_MAX_ROTATED_FILES",
            &mut self.logging.max_rotated_files,
        )?;

        // paths
        if let Some(raw) = lookup("CSW_JSONL_LOG") {
            self.paths.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    /// Clamp values that have a defined floor instead of rejecting them.
    fn normalize(&mut self) {
        if self.sweep.scan_interval_ticks < MIN_SCAN_INTERVAL_TICKS {
            self.sweep.scan_interval_ticks = MIN_SCAN_INTERVAL_TICKS;
        }
    }

    fn validate(&self) -> Result<()> {
        // -1 is the view-distance delegation sentinel; anything below it is a typo.
        if self.sweep.chunk_radius < -1 {
            return Err(SweepError::InvalidConfig {
                details: format!(
                    "sweep.chunk-radius must be >= -1, got {}",
                    self.sweep.chunk_radius
                ),
            });
        }

        if self.logging.channel_capacity == 0 {
            return Err(SweepError::InvalidConfig {
                details: "logging.channel-capacity must be >= 1".to_string(),
            });
        }
        if self.logging.max_size_bytes == 0 {
            return Err(SweepError::InvalidConfig {
                details: "logging.max-size-bytes must be > 0".to_string(),
            });
        }
        // The rotation shift needs at least one slot to move the live file into.
        if self.logging.max_rotated_files == 0 {
            return Err(SweepError::InvalidConfig {
                details: "logging.max-rotated-files must be >= 1".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_u32(lookup: &dyn Fn(&str) -> Option<String>, name: &str, slot: &mut u32) -> Result<()> {
    if let Some(raw) = lookup(name) {
        *slot = raw.parse::<u32>().map_err(|error| SweepError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_i32(lookup: &dyn Fn(&str) -> Option<String>, name: &str, slot: &mut i32) -> Result<()> {
    if let Some(raw) = lookup(name) {
        *slot = raw.parse::<i32>().map_err(|error| SweepError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_u64(lookup: &dyn Fn(&str) -> Option<String>, name: &str, slot: &mut u64) -> Result<()> {
    if let Some(raw) = lookup(name) {
        *slot = raw.parse::<u64>().map_err(|error| SweepError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_usize(lookup: &dyn Fn(&str) -> Option<String>, name: &str, slot: &mut usize) -> Result<()> {
    if let Some(raw) = lookup(name) {
        *slot = raw
            .parse::<usize>()
            .map_err(|error| SweepError::ConfigParse {
                context: "env",
                details: format!("{name}={raw:?}: {error}"),
            })?;
    }
    Ok(())
}

fn set_bool(lookup: &dyn Fn(&str) -> Option<String>, name: &str, slot: &mut bool) -> Result<()> {
    if let Some(raw) = lookup(name) {
        *slot = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(SweepError::ConfigParse {
                    context: "env",
                    details: format!("{name}={other:?}: expected a boolean"),
                });
            }
        };
    }
    Ok(())
}
