//! Service lifecycle and activity-log contract: what ends up in the JSONL
//! file, and when nothing must.

use std::fs;
use std::path::Path;

use chunk_sweeper::core::config::Config;
use chunk_sweeper::host::api::{ChunkPos, Inventory, ItemStack};
use chunk_sweeper::host::sim::SimHost;
use chunk_sweeper::logger::jsonl::{EventType, LogEntry};
use chunk_sweeper::service::SweepService;
use chunk_sweeper::sweep::SWEEP_CAPABILITY;
use chunk_sweeper::sweep::command::CommandSender;

fn config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.sweep.scan_interval_ticks = 1;
    config.sweep.chunk_radius = 0;
    config.paths.jsonl_log = dir.join("activity.jsonl");
    config
}

fn read_events(path: &Path) -> Vec<LogEntry> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn stocked() -> Inventory {
    let mut inv = Inventory::with_capacity(27);
    inv.set_slot(0, ItemStack::new("gold_ingot", 7));
    inv
}

#[test]
fn lifecycle_events_bracket_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let log_path = config.paths.jsonl_log.clone();

    let service = SweepService::start_with_config(config).unwrap();
    service.stop();

    let raw = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("service_start"));
    assert!(lines[0].contains("config_hash="));
    assert!(lines[1].contains("service_stop"));
}

#[test]
fn sweep_that_clears_something_is_logged_with_counters() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let log_path = config.paths.jsonl_log.clone();

    let host = SimHost::new();
    let pos = ChunkPos::new(2, 2);
    host.load_chunk(pos);
    host.add_container(pos, stocked());
    host.add_item_display(pos, false, Some(ItemStack::new("map", 1)));
    let player = host.add_player("steve", pos, &[SWEEP_CAPABILITY]);

    let mut service = SweepService::start_with_config(config).unwrap();
    service.handle_command(&host, CommandSender::Player(player));
    service.on_tick(&host);
    service.stop();

    let raw = fs::read_to_string(&log_path).unwrap();
    let sweep_line = raw
        .lines()
        .find(|line| line.contains("sweep_complete"))
        .expect("one sweep_complete entry");
    let entry: LogEntry = serde_json::from_str(sweep_line).unwrap();
    assert_eq!(entry.player.as_deref(), Some("steve"));
    assert_eq!(entry.containers, Some(1));
    assert_eq!(entry.item_displays, Some(1));
    assert_eq!(entry.entity_inventories, Some(0));
    assert_eq!(entry.chunks_visited, Some(1));
}

#[test]
fn zero_effect_sweep_emits_no_summary() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let log_path = config.paths.jsonl_log.clone();

    let host = SimHost::new();
    let pos = ChunkPos::new(0, 0);
    host.load_chunk(pos);
    // Nothing clearable: an empty container and a bystander.
    host.add_container(pos, Inventory::with_capacity(27));
    host.add_bystander(pos);
    let player = host.add_player("steve", pos, &[SWEEP_CAPABILITY]);

    let mut service = SweepService::start_with_config(config).unwrap();
    service.handle_command(&host, CommandSender::Player(player));
    for _ in 0..5 {
        service.on_tick(&host);
    }
    service.stop();

    let raw = fs::read_to_string(&log_path).unwrap();
    assert!(!raw.contains("sweep_complete"));
}

#[test]
fn log_stats_off_suppresses_summaries_but_not_clearing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.sweep.log_stats = false;
    let log_path = config.paths.jsonl_log.clone();

    let host = SimHost::new();
    let pos = ChunkPos::new(0, 0);
    host.load_chunk(pos);
    host.add_container(pos, stocked());
    let player = host.add_player("steve", pos, &[SWEEP_CAPABILITY]);

    let mut service = SweepService::start_with_config(config).unwrap();
    service.handle_command(&host, CommandSender::Player(player));
    service.on_tick(&host);
    service.stop();

    assert_eq!(host.remaining_stocked_inventories(), 0);
    let raw = fs::read_to_string(&log_path).unwrap();
    assert!(!raw.contains("sweep_complete"));
}

#[test]
fn toggle_and_eviction_events_carry_the_player_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let log_path = config.paths.jsonl_log.clone();

    let host = SimHost::new();
    let pos = ChunkPos::new(0, 0);
    host.load_chunk(pos);
    let player = host.add_player("alex", pos, &[SWEEP_CAPABILITY]);

    let mut service = SweepService::start_with_config(config).unwrap();
    service.handle_command(&host, CommandSender::Player(player));
    host.revoke_permission(player, SWEEP_CAPABILITY);
    service.on_tick(&host);
    service.stop();

    let events = read_events(&log_path);
    let enabled = events
        .iter()
        .find(|e| e.event == EventType::ModeEnabled)
        .expect("mode_enabled entry");
    assert_eq!(enabled.player.as_deref(), Some("alex"));
    let evicted = events
        .iter()
        .find(|e| e.event == EventType::PlayerEvicted)
        .expect("player_evicted entry");
    assert_eq!(evicted.player.as_deref(), Some("alex"));
}

#[test]
fn console_toggle_is_rejected_and_unlogged() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let log_path = config.paths.jsonl_log.clone();

    let host = SimHost::new();
    let service = SweepService::start_with_config(config).unwrap();
    let handled = service.handle_command(&host, CommandSender::Console);
    service.stop();

    assert!(handled);
    assert_eq!(host.console_messages().len(), 1);
    let raw = fs::read_to_string(&log_path).unwrap();
    assert!(!raw.contains("mode_enabled"));
    assert!(!raw.contains("mode_disabled"));
}

#[test]
fn stop_clears_the_shared_registry() {
    let dir = tempfile::tempdir().unwrap();
    let host = SimHost::new();
    let player = host.add_player("steve", ChunkPos::new(0, 0), &[SWEEP_CAPABILITY]);

    let service = SweepService::start_with_config(config(dir.path())).unwrap();
    service.handle_command(&host, CommandSender::Player(player));
    let registry = std::sync::Arc::clone(service.registry());
    assert!(registry.is_enabled(player));
    service.stop();
    assert!(registry.is_empty());
}
