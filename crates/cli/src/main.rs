//! NKP Sizer CLI
//!
//! A command-line tool for sizing NKP clusters: record workloads and
//! hardware, check utilization, and forecast capacity growth.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{growth, hardware, project, summary, workloads, Session};
use sizer_lib::{Cluster, LicenseTier};
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// NKP Sizer CLI
#[derive(Parser)]
#[command(name = "nkps")]
#[command(author, version, about = "Capacity sizing for NKP clusters", long_about = None)]
pub struct Cli {
    /// Directory holding the project file (overrides the config file)
    #[arg(long, env = "NKPS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a config file
    #[arg(long, env = "NKPS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Skip confirmation prompts
    #[arg(long, short, global = true)]
    pub yes: bool,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage workloads
    #[command(subcommand)]
    Workload(WorkloadCommands),

    /// Manage hardware configurations
    #[command(subcommand)]
    Hardware(HardwareCommands),

    /// Manage annual growth rates
    #[command(subcommand)]
    Growth(GrowthCommands),

    /// Show utilization, capacity and license figures for a cluster
    Summary {
        /// Cluster to summarize (defaults to the configured cluster)
        #[arg(long, short)]
        cluster: Option<Cluster>,
    },

    /// Show projected supply over the coming years
    Forecast {
        /// Cluster to forecast (defaults to the configured cluster)
        #[arg(long, short)]
        cluster: Option<Cluster>,
    },

    /// Show record counts per cluster
    Clusters,

    /// Show or change the license tier
    #[command(subcommand)]
    License(LicenseCommands),

    /// Show or change the project name
    #[command(subcommand)]
    Name(NameCommands),

    /// Discard all records and reseed the project
    Reset,

    /// Print sizing figures in the Prometheus text format
    Metrics,
}

#[derive(Subcommand)]
pub enum WorkloadCommands {
    /// List workloads
    List {
        /// Filter by cluster
        #[arg(long, short)]
        cluster: Option<Cluster>,
    },

    /// Add a workload
    Add(workloads::WorkloadArgs),

    /// Update a workload
    Update(workloads::WorkloadUpdateArgs),

    /// Remove a workload
    Remove {
        /// Workload ID
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum HardwareCommands {
    /// List hardware configurations
    List {
        /// Filter by cluster
        #[arg(long, short)]
        cluster: Option<Cluster>,
    },

    /// Add a hardware configuration
    Add(hardware::HardwareArgs),

    /// Update a hardware configuration
    Update(hardware::HardwareUpdateArgs),

    /// Remove a hardware configuration
    Remove {
        /// Hardware ID
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum GrowthCommands {
    /// List growth rates
    List,

    /// Add a rate for a year without one (defaults to the next open year)
    Add {
        /// Growth percentage
        #[arg(long)]
        rate: f64,

        /// Year to register
        #[arg(long)]
        year: Option<i32>,
    },

    /// Set the rate for a year, replacing any existing one
    Set {
        /// Year
        year: i32,

        /// Growth percentage
        rate: f64,
    },

    /// Remove the rate for a year
    Remove {
        /// Year
        year: i32,
    },
}

#[derive(Subcommand)]
pub enum LicenseCommands {
    /// Show the license tier
    Show,

    /// Set the license tier (starter, pro, ultimate)
    Set {
        license: LicenseTier,
    },
}

#[derive(Subcommand)]
pub enum NameCommands {
    /// Show the project name
    Show,

    /// Rename the project
    Set {
        name: String,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(io::stderr)))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = config::SizerConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    debug!(data_dir = %config.data_dir.display(), "Configuration loaded");

    let mut session = Session::open(&config, cli.format, cli.yes)?;

    match cli.command {
        Commands::Workload(cmd) => match cmd {
            WorkloadCommands::List { cluster } => workloads::list_workloads(&session, cluster)?,
            WorkloadCommands::Add(args) => workloads::add_workload(&mut session, args)?,
            WorkloadCommands::Update(args) => workloads::update_workload(&mut session, args)?,
            WorkloadCommands::Remove { id } => workloads::remove_workload(&mut session, id)?,
        },
        Commands::Hardware(cmd) => match cmd {
            HardwareCommands::List { cluster } => hardware::list_hardware(&session, cluster)?,
            HardwareCommands::Add(args) => hardware::add_hardware(&mut session, args)?,
            HardwareCommands::Update(args) => hardware::update_hardware(&mut session, args)?,
            HardwareCommands::Remove { id } => hardware::remove_hardware(&mut session, id)?,
        },
        Commands::Growth(cmd) => match cmd {
            GrowthCommands::List => growth::list_growth(&session)?,
            GrowthCommands::Add { rate, year } => growth::add_growth(&mut session, year, rate)?,
            GrowthCommands::Set { year, rate } => growth::set_growth(&mut session, year, rate)?,
            GrowthCommands::Remove { year } => growth::remove_growth(&mut session, year)?,
        },
        Commands::Summary { cluster } => summary::show_summary(&session, cluster)?,
        Commands::Forecast { cluster } => summary::show_forecast(&session, cluster)?,
        Commands::Clusters => summary::list_clusters(&session)?,
        Commands::License(cmd) => match cmd {
            LicenseCommands::Show => project::show_license(&session)?,
            LicenseCommands::Set { license } => project::set_license(&mut session, license)?,
        },
        Commands::Name(cmd) => match cmd {
            NameCommands::Show => project::show_name(&session)?,
            NameCommands::Set { name } => project::set_name(&mut session, &name)?,
        },
        Commands::Reset => project::reset_project(&mut session)?,
        Commands::Metrics => summary::export_metrics(&session)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    if let Err(err) = run(cli) {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
