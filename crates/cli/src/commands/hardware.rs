//! Hardware CLI commands

use anyhow::Result;
use clap::Args;
use sizer_lib::{
    Cluster, HardwareConfig, HardwareSpec, NodeSpec, ReservedResources, SizingError, SizingSource,
    SizingStore, SupplyTotals,
};
use tabled::Tabled;

use super::Session;
use crate::output::{format_gib, print_info, print_json, print_list, print_success, OutputFormat};

/// Fields of a new hardware configuration
#[derive(Args, Debug)]
pub struct HardwareArgs {
    /// Hardware configuration name
    #[arg(long)]
    pub name: String,

    /// Cluster the nodes belong to (defaults to the configured cluster)
    #[arg(long, short)]
    pub cluster: Option<Cluster>,

    /// Control plane node count
    #[arg(long, default_value_t = 3)]
    pub cp_count: u32,

    /// vCPUs per control plane node
    #[arg(long, default_value_t = 4)]
    pub cp_vcpus: u32,

    /// Memory per control plane node in GiB
    #[arg(long, default_value_t = 16)]
    pub cp_memory: u32,

    /// Disk per control plane node in GiB
    #[arg(long, default_value_t = 80)]
    pub cp_disk: u32,

    /// Worker node count
    #[arg(long, default_value_t = 4)]
    pub worker_count: u32,

    /// vCPUs per worker node
    #[arg(long, default_value_t = 8)]
    pub worker_vcpus: u32,

    /// Memory per worker node in GiB
    #[arg(long, default_value_t = 32)]
    pub worker_memory: u32,

    /// Disk per worker node in GiB
    #[arg(long, default_value_t = 100)]
    pub worker_disk: u32,

    /// Reserved vCPUs
    #[arg(long, default_value_t = 12)]
    pub reserved_vcpus: u32,

    /// Reserved memory in GiB
    #[arg(long, default_value_t = 15)]
    pub reserved_memory: u32,
}

impl HardwareArgs {
    fn into_spec(self, cluster: Cluster) -> HardwareSpec {
        HardwareSpec {
            name: self.name,
            cluster,
            control_plane: NodeSpec::new(self.cp_count, self.cp_vcpus, self.cp_memory, self.cp_disk),
            worker: NodeSpec::new(
                self.worker_count,
                self.worker_vcpus,
                self.worker_memory,
                self.worker_disk,
            ),
            reserved: ReservedResources {
                vcpus: self.reserved_vcpus,
                memory_gib: self.reserved_memory,
            },
        }
    }
}

/// Fields to change on an existing hardware configuration
#[derive(Args, Debug)]
pub struct HardwareUpdateArgs {
    /// Hardware ID
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short)]
    pub cluster: Option<Cluster>,

    #[arg(long)]
    pub cp_count: Option<u32>,

    #[arg(long)]
    pub cp_vcpus: Option<u32>,

    /// Memory per control plane node in GiB
    #[arg(long)]
    pub cp_memory: Option<u32>,

    /// Disk per control plane node in GiB
    #[arg(long)]
    pub cp_disk: Option<u32>,

    #[arg(long)]
    pub worker_count: Option<u32>,

    #[arg(long)]
    pub worker_vcpus: Option<u32>,

    /// Memory per worker node in GiB
    #[arg(long)]
    pub worker_memory: Option<u32>,

    /// Disk per worker node in GiB
    #[arg(long)]
    pub worker_disk: Option<u32>,

    #[arg(long)]
    pub reserved_vcpus: Option<u32>,

    /// Reserved memory in GiB
    #[arg(long)]
    pub reserved_memory: Option<u32>,
}

impl HardwareUpdateArgs {
    fn apply(self, spec: &mut HardwareSpec) {
        if let Some(name) = self.name {
            spec.name = name;
        }
        if let Some(cluster) = self.cluster {
            spec.cluster = cluster;
        }

        let cp = &mut spec.control_plane;
        cp.count = self.cp_count.unwrap_or(cp.count);
        cp.vcpus = self.cp_vcpus.unwrap_or(cp.vcpus);
        cp.memory_gib = self.cp_memory.unwrap_or(cp.memory_gib);
        cp.disk_gib = self.cp_disk.unwrap_or(cp.disk_gib);

        let worker = &mut spec.worker;
        worker.count = self.worker_count.unwrap_or(worker.count);
        worker.vcpus = self.worker_vcpus.unwrap_or(worker.vcpus);
        worker.memory_gib = self.worker_memory.unwrap_or(worker.memory_gib);
        worker.disk_gib = self.worker_disk.unwrap_or(worker.disk_gib);

        let reserved = &mut spec.reserved;
        reserved.vcpus = self.reserved_vcpus.unwrap_or(reserved.vcpus);
        reserved.memory_gib = self.reserved_memory.unwrap_or(reserved.memory_gib);
    }
}

/// Row for hardware table
#[derive(Tabled)]
struct HardwareRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Control Plane")]
    control_plane: String,
    #[tabled(rename = "Workers")]
    worker: String,
    #[tabled(rename = "Reserved")]
    reserved: String,
    #[tabled(rename = "vCPU")]
    vcpus: u64,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Disk")]
    disk: String,
}

fn describe_nodes(nodes: &NodeSpec) -> String {
    format!(
        "{} x {}c/{}G/{}G",
        nodes.count, nodes.vcpus, nodes.memory_gib, nodes.disk_gib
    )
}

impl From<&HardwareConfig> for HardwareRow {
    fn from(h: &HardwareConfig) -> Self {
        let totals = SupplyTotals::of(h);
        Self {
            id: h.id,
            name: h.spec.name.clone(),
            cluster: h.spec.cluster.to_string(),
            control_plane: describe_nodes(&h.spec.control_plane),
            worker: describe_nodes(&h.spec.worker),
            reserved: format!("{}c/{}G", h.spec.reserved.vcpus, h.spec.reserved.memory_gib),
            vcpus: totals.vcpus,
            memory: format_gib(totals.memory as f64),
            disk: format_gib(totals.disk as f64),
        }
    }
}

/// List hardware configurations, optionally for one cluster
pub fn list_hardware(session: &Session, cluster: Option<Cluster>) -> Result<()> {
    let hardware = session.store.hardware(cluster);

    print_list(
        &hardware,
        |items| items.iter().map(HardwareRow::from).collect(),
        "No hardware configured",
        session.format,
    )
}

/// Add a hardware configuration
pub fn add_hardware(session: &mut Session, args: HardwareArgs) -> Result<()> {
    let cluster = session.cluster(args.cluster);
    let record = session.store.add_hardware(args.into_spec(cluster))?;
    session
        .logger
        .log_record_added("hardware", record.id, &record.spec.name, record.spec.cluster);

    report_saved(session.format, &record, "added")
}

/// Update fields of an existing hardware configuration
pub fn update_hardware(session: &mut Session, args: HardwareUpdateArgs) -> Result<()> {
    let id = args.id;
    let mut spec = session
        .store
        .hardware(None)
        .into_iter()
        .find(|h| h.id == id)
        .map(|h| h.spec)
        .ok_or(SizingError::NotFound {
            kind: "hardware",
            id,
        })?;
    args.apply(&mut spec);

    let record = session.store.update_hardware(id, spec)?;
    session
        .logger
        .log_record_updated("hardware", record.id, &record.spec.name, record.spec.cluster);

    report_saved(session.format, &record, "updated")
}

fn report_saved(format: OutputFormat, record: &HardwareConfig, action: &str) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record)?,
        OutputFormat::Table => {
            let totals = SupplyTotals::of(record);
            print_success(&format!(
                "Hardware \"{}\" {} (id {}, cluster {}): {} vCPU, {} memory, {} disk",
                record.spec.name,
                action,
                record.id,
                record.spec.cluster,
                totals.vcpus,
                format_gib(totals.memory as f64),
                format_gib(totals.disk as f64)
            ));
        }
    }
    Ok(())
}

/// Remove a hardware configuration after confirmation
pub fn remove_hardware(session: &mut Session, id: u64) -> Result<()> {
    let name = session
        .store
        .hardware(None)
        .into_iter()
        .find(|h| h.id == id)
        .map(|h| h.spec.name)
        .unwrap_or_else(|| id.to_string());

    if !session.confirm(&format!(
        "Do you want to delete \"{}\"? This action cannot be undone!",
        name
    ))? {
        print_info("Cancelled");
        return Ok(());
    }

    let record = session.store.remove_hardware(id)?;
    session
        .logger
        .log_record_removed("hardware", record.id, &record.spec.name);

    match session.format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Table => print_success(&format!(
            "Hardware \"{}\" has been deleted successfully",
            record.spec.name
        )),
    }
    Ok(())
}
