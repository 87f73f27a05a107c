//! Activity logger: a dedicated thread owns the JSONL writer; every other
//! context sends [`ActivityEvent`]s through a bounded crossbeam channel.
//!
//! `try_send()` keeps the game tick free of logging back-pressure: a full
//! channel drops the event and bumps a counter instead of blocking.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::core::errors::Result;
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

/// Default bounded channel capacity for log events.
const CHANNEL_CAPACITY: usize = 1024;

// ──────────────────── public event type ────────────────────

/// Events flowing from the sweeper to the logger thread.
#[derive(Debug, Clone)]
pub enum ActivityEvent {
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
        uptime_secs: u64,
    },
    /// One sweep that cleared at least one thing.
    SweepCompleted {
        player: String,
        containers: u64,
        item_displays: u64,
        entity_inventories: u64,
        chunks_visited: u32,
    },
    ModeEnabled {
        player: String,
    },
    ModeDisabled {
        player: String,
    },
    /// Player removed from the registry after losing the capability.
    PlayerEvicted {
        player: String,
    },
    Error {
        code: String,
        message: String,
    },
    /// Sentinel to request graceful shutdown of the logger thread.
    Shutdown,
}

// ──────────────────── public handle ────────────────────

/// Thread-safe, cheaply-cloneable handle for sending log events.
#[derive(Clone)]
pub struct ActivityLoggerHandle {
    tx: Sender<ActivityEvent>,
    dropped_events: Arc<AtomicU64>,
}

impl ActivityLoggerHandle {
    /// Send an event to the logger thread. Non-blocking.
    ///
    /// If the channel is full the event is dropped and the dropped-events
    /// counter is incremented.
    pub fn send(&self, event: ActivityEvent) {
        if let Err(TrySendError::Full(_)) = self.tx.try_send(event) {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
        // Disconnected is fine during shutdown.
    }

    /// Number of events dropped due to channel back-pressure.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Request graceful shutdown of the logger thread.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ActivityEvent::Shutdown);
    }

    /// Handle with no logger thread behind it; every send is a no-op.
    /// Useful for unit tests and headless embedding.
    #[must_use]
    pub fn disconnected() -> Self {
        let (tx, _rx) = bounded(1);
        Self {
            tx,
            dropped_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

// ──────────────────── configuration ────────────────────

/// Options for building the activity logger.
#[derive(Debug, Clone)]
pub struct ActivityLoggerConfig {
    /// JSONL writer config.
    pub jsonl: JsonlConfig,
    /// Bounded channel capacity.
    pub channel_capacity: usize,
}

impl Default for ActivityLoggerConfig {
    fn default() -> Self {
        Self {
            jsonl: JsonlConfig::default(),
            channel_capacity: CHANNEL_CAPACITY,
        }
    }
}

// ──────────────────── spawn ────────────────────

/// Spawn the logger thread and return a handle plus its join handle.
///
/// The returned handle is `Clone + Send`. The thread runs until
/// `handle.shutdown()` is called or all senders are dropped.
pub fn spawn_logger(
    config: ActivityLoggerConfig,
) -> Result<(ActivityLoggerHandle, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<ActivityEvent>(config.channel_capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_clone = Arc::clone(&dropped);

    let handle = ActivityLoggerHandle {
        tx,
        dropped_events: dropped,
    };

    let join = thread::Builder::new()
        .name("csw-logger".to_string())
        .spawn(move || {
            logger_thread_main(&rx, config.jsonl, &dropped_clone);
        })
        .map_err(|e| crate::core::errors::SweepError::Runtime {
            details: format!("failed to spawn logger thread: {e}"),
        })?;

    Ok((handle, join))
}

// ──────────────────── logger thread ────────────────────

fn logger_thread_main(
    rx: &Receiver<ActivityEvent>,
    jsonl_config: JsonlConfig,
    dropped: &Arc<AtomicU64>,
) {
    let mut jsonl = JsonlWriter::open(jsonl_config);

    while let Ok(event) = rx.recv() {
        // Report dropped events before handling the next one.
        let d = dropped.swap(0, Ordering::Relaxed);
        if d > 0 {
            let mut warn = LogEntry::new(EventType::Error, Severity::Warning);
            warn.details = Some(format!("{d} log events dropped due to back-pressure"));
            jsonl.write_entry(&warn);
        }

        if matches!(event, ActivityEvent::Shutdown) {
            jsonl.flush();
            break;
        }

        jsonl.write_entry(&event_to_log_entry(&event));
        jsonl.flush();
    }
    jsonl.flush();
}

fn event_to_log_entry(event: &ActivityEvent) -> LogEntry {
    match event {
        ActivityEvent::ServiceStarted {
            version,
            config_hash,
        } => {
            let mut entry = LogEntry::new(EventType::ServiceStart, Severity::Info);
            entry.details = Some(format!("version={version} config_hash={config_hash}"));
            entry
        }
        ActivityEvent::ServiceStopped {
            reason,
            uptime_secs,
        } => {
            let mut entry = LogEntry::new(EventType::ServiceStop, Severity::Info);
            entry.details = Some(format!("{reason} (uptime={uptime_secs}s)"));
            entry
        }
        ActivityEvent::SweepCompleted {
            player,
            containers,
            item_displays,
            entity_inventories,
            chunks_visited,
        } => {
            let mut entry = LogEntry::new(EventType::SweepComplete, Severity::Info);
            entry.player = Some(player.clone());
            entry.containers = Some(*containers);
            entry.item_displays = Some(*item_displays);
            entry.entity_inventories = Some(*entity_inventories);
            entry.chunks_visited = Some(*chunks_visited);
            entry
        }
        ActivityEvent::ModeEnabled { player } => {
            let mut entry = LogEntry::new(EventType::ModeEnabled, Severity::Info);
            entry.player = Some(player.clone());
            entry
        }
        ActivityEvent::ModeDisabled { player } => {
            let mut entry = LogEntry::new(EventType::ModeDisabled, Severity::Info);
            entry.player = Some(player.clone());
            entry
        }
        ActivityEvent::PlayerEvicted { player } => {
            let mut entry = LogEntry::new(EventType::PlayerEvicted, Severity::Warning);
            entry.player = Some(player.clone());
            entry.details = Some("capability revoked, removed from cleanup mode".to_string());
            entry
        }
        ActivityEvent::Error { code, message } => {
            let mut entry = LogEntry::new(EventType::Error, Severity::Warning);
            entry.error_code = Some(code.clone());
            entry.error_message = Some(message.clone());
            entry
        }
        ActivityEvent::Shutdown => LogEntry::new(EventType::ServiceStop, Severity::Info),
    }
}
