//! Service lifecycle: wires config, registry, driver, and the logger thread
//! into one embeddable unit with start/stop semantics.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::host::api::Host;
use crate::logger::activity::{
    ActivityEvent, ActivityLoggerConfig, ActivityLoggerHandle, spawn_logger,
};
use crate::logger::jsonl::JsonlConfig;
use crate::sweep::command::{CommandSender, handle_toggle};
use crate::sweep::driver::SweepDriver;
use crate::sweep::registry::SweepRegistry;

/// Running sweeper instance. One per host server.
pub struct SweepService {
    config: Config,
    registry: Arc<SweepRegistry>,
    driver: SweepDriver,
    logger: ActivityLoggerHandle,
    logger_join: Option<thread::JoinHandle<()>>,
    started_at: Instant,
}

impl SweepService {
    /// Load configuration and start the service, including the logger thread.
    pub fn start(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        Self::start_with_config(config)
    }

    /// Start from an already-built configuration.
    pub fn start_with_config(config: Config) -> Result<Self> {
        let (logger, logger_join) = spawn_logger(ActivityLoggerConfig {
            jsonl: JsonlConfig {
                path: config.paths.jsonl_log.clone(),
                max_size_bytes: config.logging.max_size_bytes,
                max_rotated_files: config.logging.max_rotated_files,
            },
            channel_capacity: config.logging.channel_capacity,
        })?;

        logger.send(ActivityEvent::ServiceStarted {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config_hash: config.stable_hash()?,
        });

        let registry = Arc::new(SweepRegistry::new());
        let driver = SweepDriver::new(config.sweep.clone(), Arc::clone(&registry), logger.clone());

        Ok(Self {
            config,
            registry,
            driver,
            logger,
            logger_join: Some(logger_join),
            started_at: Instant::now(),
        })
    }

    /// Effective configuration the service runs with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opt-in registry, shared with the driver.
    #[must_use]
    pub fn registry(&self) -> &Arc<SweepRegistry> {
        &self.registry
    }

    /// Logger handle for additional event sources.
    #[must_use]
    pub fn logger(&self) -> &ActivityLoggerHandle {
        &self.logger
    }

    /// Dispatch the cleanup-mode toggle command.
    pub fn handle_command(&self, host: &dyn Host, sender: CommandSender) -> bool {
        handle_toggle(host, &self.registry, &self.logger, sender)
    }

    /// Advance one host tick. Call from the host's serialized tick context.
    pub fn on_tick(&mut self, host: &dyn Host) {
        self.driver.on_tick(host);
    }

    /// Stop the service: clear the registry and shut the logger thread down.
    pub fn stop(mut self) {
        self.registry.clear();
        self.logger.send(ActivityEvent::ServiceStopped {
            reason: "service stop requested".to_string(),
            uptime_secs: self.started_at.elapsed().as_secs(),
        });
        self.logger.shutdown();
        if let Some(join) = self.logger_join.take() {
            let _ = join.join();
        }
    }
}
