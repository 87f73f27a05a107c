//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::{Colorize, control};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chunk_sweeper::core::config::Config;
use chunk_sweeper::core::errors::SweepError;
use chunk_sweeper::host::api::{ChunkPos, Inventory, ItemStack};
use chunk_sweeper::host::sim::SimHost;
use chunk_sweeper::service::SweepService;
use chunk_sweeper::sweep::SWEEP_CAPABILITY;
use chunk_sweeper::sweep::command::CommandSender;

/// Chunk Sweeper — opt-in cleanup mode for voxel-game servers.
#[derive(Debug, Parser)]
#[command(
    name = "csw",
    author,
    version,
    about = "Chunk Sweeper - opt-in container cleanup",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run a seeded in-memory world simulation and report what got swept.
    Simulate(SimulateArgs),
    /// View and validate configuration state.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args, Serialize)]
struct SimulateArgs {
    /// Host ticks to simulate.
    #[arg(long, default_value_t = 100)]
    ticks: u32,
    /// Number of admins with cleanup mode enabled.
    #[arg(long, default_value_t = 2)]
    players: u32,
    /// Stocked containers scattered across the world.
    #[arg(long, default_value_t = 40)]
    containers: u32,
    /// Item displays holding an item.
    #[arg(long, default_value_t = 10)]
    item_displays: u32,
    /// Inventory-holder entities with stocked inventories.
    #[arg(long, default_value_t = 5)]
    inventory_holders: u32,
    /// Half-width of the loaded world square, in chunks.
    #[arg(long, default_value_t = 16)]
    world_size: i32,
    /// RNG seed for reproducible worlds.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the effective config file path.
    Path,
    /// Print the effective configuration as TOML.
    Show,
    /// Load and validate the configuration.
    Validate,
}

/// CLI-level errors with stable exit semantics.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Library-level failure.
    #[error(transparent)]
    Sweep(#[from] SweepError),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Simulate(args) => run_simulate(cli, args),
        Command::Config(args) => run_config(cli, args),
    }
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

fn run_simulate(cli: &Cli, args: &SimulateArgs) -> Result<(), CliError> {
    if args.world_size < 0 {
        return Err(CliError::User("--world-size must be >= 0".to_string()));
    }

    let mut config = Config::load(cli.config.as_deref())?;
    // Keep simulation logs out of the real activity log unless asked for.
    if cli.config.is_none() && std::env::var_os("CSW_JSONL_LOG").is_none() {
        config.paths.jsonl_log = std::env::temp_dir().join("csw-simulate.jsonl");
    }
    let log_path = config.paths.jsonl_log.clone();

    let host = SimHost::new();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let span = args.world_size;

    for x in -span..=span {
        for z in -span..=span {
            host.load_chunk(ChunkPos::new(x, z));
        }
    }

    let random_chunk = |rng: &mut StdRng| {
        ChunkPos::new(rng.random_range(-span..=span), rng.random_range(-span..=span))
    };

    for _ in 0..args.containers {
        let pos = random_chunk(&mut rng);
        let mut inv = Inventory::with_capacity(27);
        let filled: usize = rng.random_range(1..=5);
        for slot in 0..filled {
            inv.set_slot(slot, ItemStack::new("cobblestone", rng.random_range(1..=64)));
        }
        host.add_container(pos, inv);
    }
    for _ in 0..args.item_displays {
        let pos = random_chunk(&mut rng);
        let glowing = rng.random_range(0..4) == 0;
        host.add_item_display(pos, glowing, Some(ItemStack::new("map", 1)));
    }
    for _ in 0..args.inventory_holders {
        let pos = random_chunk(&mut rng);
        let mut inv = Inventory::with_capacity(27);
        inv.set_slot(0, ItemStack::new("coal", rng.random_range(1..=64)));
        host.add_inventory_holder(pos, inv);
    }

    let before = host.remaining_stocked_inventories();

    let mut service = SweepService::start_with_config(config)?;
    for i in 0..args.players {
        let pos = random_chunk(&mut rng);
        let player = host.add_player(format!("admin-{i}"), pos, &[SWEEP_CAPABILITY]);
        service.handle_command(&host, CommandSender::Player(player));
    }

    for _ in 0..args.ticks {
        service.on_tick(&host);
    }

    let after = host.remaining_stocked_inventories();
    let dropped = service.logger().dropped_events();
    service.stop();

    match output_mode(cli) {
        OutputMode::Json => {
            let payload = json!({
                "command": "simulate",
                "seed": args.seed,
                "ticks": args.ticks,
                "players": args.players,
                "stocked_before": before,
                "stocked_after": after,
                "cleared": before.saturating_sub(after),
                "dropped_log_events": dropped,
                "log_path": log_path,
            });
            writeln!(io::stdout(), "{}", serde_json::to_string_pretty(&payload)?)?;
        }
        OutputMode::Human => {
            let mut stdout = io::stdout();
            writeln!(
                stdout,
                "{} {} ticks, {} admins, seed {}",
                "simulated".green().bold(),
                args.ticks,
                args.players,
                args.seed
            )?;
            writeln!(
                stdout,
                "  stocked inventories: {before} before, {after} after ({} cleared)",
                before.saturating_sub(after)
            )?;
            writeln!(stdout, "  activity log: {}", log_path.display())?;
            if dropped > 0 {
                writeln!(stdout, "  {} {dropped} log events dropped", "warning:".yellow())?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Path => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(Config::default_path);
            writeln!(io::stdout(), "{}", path.display())?;
            Ok(())
        }
        ConfigCommand::Show => {
            let config = Config::load(cli.config.as_deref())?;
            match output_mode(cli) {
                OutputMode::Json => {
                    writeln!(io::stdout(), "{}", serde_json::to_string_pretty(&config)?)?;
                }
                OutputMode::Human => {
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::User(format!("render config: {e}")))?;
                    write!(io::stdout(), "{rendered}")?;
                }
            }
            Ok(())
        }
        ConfigCommand::Validate => {
            let config = Config::load(cli.config.as_deref())?;
            let hash = config.stable_hash()?;
            match output_mode(cli) {
                OutputMode::Json => {
                    let payload = json!({ "valid": true, "config_hash": hash });
                    writeln!(io::stdout(), "{}", serde_json::to_string(&payload)?)?;
                }
                OutputMode::Human => {
                    writeln!(
                        io::stdout(),
                        "{} configuration valid (hash {hash})",
                        "ok:".green().bold()
                    )?;
                }
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// output mode
// ---------------------------------------------------------------------------

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("CSW_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        Some("auto") | None => fallback,
        Some(_) => fallback,
    }
}
