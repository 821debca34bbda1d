//! CLI command implementations

pub mod growth;
pub mod hardware;
pub mod project;
pub mod summary;
pub mod workloads;

use anyhow::{Context, Result};
use sizer_lib::{Cluster, JsonFileStore, SizingEngine, SizingSource, StructuredLogger};
use std::io::{self, BufRead, Write};

use crate::config::SizerConfig;
use crate::output::OutputFormat;

/// State shared by every command for one invocation
pub struct Session {
    pub store: JsonFileStore,
    pub engine: SizingEngine,
    pub current_year: i32,
    pub default_cluster: Cluster,
    pub format: OutputFormat,
    pub assume_yes: bool,
    pub logger: StructuredLogger,
}

impl Session {
    /// Open the project store described by the configuration
    pub fn open(config: &SizerConfig, format: OutputFormat, assume_yes: bool) -> Result<Self> {
        let current_year = config.current_year();
        let store = JsonFileStore::open(&config.data_dir, current_year).with_context(|| {
            format!("Failed to open project in {}", config.data_dir.display())
        })?;
        let logger = StructuredLogger::new(store.project_name());

        Ok(Self {
            store,
            engine: SizingEngine::new(config.pods_per_vcpu, config.horizon_years),
            current_year,
            default_cluster: config.default_cluster()?,
            format,
            assume_yes,
            logger,
        })
    }

    /// Cluster named on the command line, or the configured default
    pub fn cluster(&self, arg: Option<Cluster>) -> Cluster {
        arg.unwrap_or(self.default_cluster)
    }

    /// Ask the user to confirm a destructive action
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        let mut stderr = io::stderr();
        write!(stderr, "{} [y/N] ", prompt)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;

        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}
