//! Workload CLI commands

use anyhow::Result;
use clap::Args;
use sizer_lib::{Cluster, SizingSource, SizingStore, WorkloadRecord, WorkloadSpec, WorkloadType};
use tabled::Tabled;

use super::Session;
use crate::output::{
    format_gib, format_quantity, print_info, print_json, print_list, print_success, OutputFormat,
};

/// Fields of a new workload
#[derive(Args, Debug)]
pub struct WorkloadArgs {
    /// Workload name
    #[arg(long)]
    pub name: String,

    /// Cluster to deploy to (defaults to the configured cluster)
    #[arg(long, short)]
    pub cluster: Option<Cluster>,

    /// Workload type (container, server-virtualization, database)
    #[arg(long = "type", default_value = "container")]
    pub workload_type: WorkloadType,

    /// Number of replicas
    #[arg(long, default_value_t = 1)]
    pub replicas: u32,

    /// vCPU demand
    #[arg(long, default_value_t = 1.0)]
    pub cpu: f64,

    /// Memory demand in GiB
    #[arg(long)]
    pub memory: f64,

    /// Data demand in GiB
    #[arg(long)]
    pub data: f64,
}

/// Fields to change on an existing workload
#[derive(Args, Debug)]
pub struct WorkloadUpdateArgs {
    /// Workload ID
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short)]
    pub cluster: Option<Cluster>,

    #[arg(long = "type")]
    pub workload_type: Option<WorkloadType>,

    #[arg(long)]
    pub replicas: Option<u32>,

    #[arg(long)]
    pub cpu: Option<f64>,

    /// Memory demand in GiB
    #[arg(long)]
    pub memory: Option<f64>,

    /// Data demand in GiB
    #[arg(long)]
    pub data: Option<f64>,
}

/// Row for workloads table
#[derive(Tabled)]
struct WorkloadRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    workload_type: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Replicas")]
    replicas: u32,
    #[tabled(rename = "vCPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Data")]
    data: String,
}

impl From<&WorkloadRecord> for WorkloadRow {
    fn from(w: &WorkloadRecord) -> Self {
        Self {
            id: w.id,
            name: w.spec.name.clone(),
            workload_type: w.spec.workload_type.to_string(),
            cluster: w.spec.cluster.to_string(),
            replicas: w.spec.replicas,
            cpu: format_quantity(w.spec.cpu),
            memory: format_gib(w.spec.memory_gib),
            data: format_gib(w.spec.data_gib),
        }
    }
}

/// List workloads, optionally for one cluster
pub fn list_workloads(session: &Session, cluster: Option<Cluster>) -> Result<()> {
    let workloads = session.store.workloads(cluster);

    print_list(
        &workloads,
        |items| items.iter().map(WorkloadRow::from).collect(),
        "No workloads found",
        session.format,
    )?;

    if matches!(session.format, OutputFormat::Table) && !workloads.is_empty() {
        println!("\nTotal: {} workloads", workloads.len());
    }
    Ok(())
}

/// Add a workload
pub fn add_workload(session: &mut Session, args: WorkloadArgs) -> Result<()> {
    let spec = WorkloadSpec {
        name: args.name,
        workload_type: args.workload_type,
        cluster: session.cluster(args.cluster),
        replicas: args.replicas,
        cpu: args.cpu,
        memory_gib: args.memory,
        data_gib: args.data,
    };

    let record = session.store.add_workload(spec)?;
    session
        .logger
        .log_record_added("workload", record.id, &record.spec.name, record.spec.cluster);

    report_saved(session.format, &record, "added")
}

/// Update fields of an existing workload
pub fn update_workload(session: &mut Session, args: WorkloadUpdateArgs) -> Result<()> {
    let existing = session
        .store
        .workloads(None)
        .into_iter()
        .find(|w| w.id == args.id)
        .ok_or(sizer_lib::SizingError::NotFound {
            kind: "workload",
            id: args.id,
        })?;

    let mut spec = existing.spec;
    if let Some(name) = args.name {
        spec.name = name;
    }
    if let Some(cluster) = args.cluster {
        spec.cluster = cluster;
    }
    if let Some(workload_type) = args.workload_type {
        spec.workload_type = workload_type;
    }
    if let Some(replicas) = args.replicas {
        spec.replicas = replicas;
    }
    if let Some(cpu) = args.cpu {
        spec.cpu = cpu;
    }
    if let Some(memory) = args.memory {
        spec.memory_gib = memory;
    }
    if let Some(data) = args.data {
        spec.data_gib = data;
    }

    let record = session.store.update_workload(args.id, spec)?;
    session
        .logger
        .log_record_updated("workload", record.id, &record.spec.name, record.spec.cluster);

    report_saved(session.format, &record, "updated")
}

/// Remove a workload after confirmation
pub fn remove_workload(session: &mut Session, id: u64) -> Result<()> {
    let name = session
        .store
        .workloads(None)
        .into_iter()
        .find(|w| w.id == id)
        .map(|w| w.spec.name)
        .unwrap_or_else(|| id.to_string());

    if !session.confirm(&format!(
        "Do you want to delete \"{}\"? This action cannot be undone!",
        name
    ))? {
        print_info("Cancelled");
        return Ok(());
    }

    let record = session.store.remove_workload(id)?;
    session
        .logger
        .log_record_removed("workload", record.id, &record.spec.name);

    match session.format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Table => print_success(&format!(
            "Workload \"{}\" has been deleted successfully",
            record.spec.name
        )),
    }
    Ok(())
}

fn report_saved(format: OutputFormat, record: &WorkloadRecord, action: &str) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record)?,
        OutputFormat::Table => {
            print_success(&format!(
                "Workload \"{}\" {} (id {}, cluster {})",
                record.spec.name, action, record.id, record.spec.cluster
            ));
        }
    }
    Ok(())
}
