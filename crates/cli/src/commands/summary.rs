//! Sizing summary, forecast and metrics commands

use anyhow::{Context, Result};
use serde::Serialize;
use sizer_lib::{Cluster, GrowthProjection, SizingMetrics, SizingSource, SizingSummary};
use tabled::Tabled;

use super::Session;
use crate::output::{
    color_tier, color_usage, format_gib, format_quantity, print_heading, print_json, print_list,
    render_table, OutputFormat,
};

/// Row for utilization gauges
#[derive(Tabled)]
struct GaugeRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Usage")]
    usage: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Row for growth projections
#[derive(Tabled)]
struct ProjectionRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "vCPU")]
    vcpu: u64,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Disk")]
    disk: String,
}

impl From<&GrowthProjection> for ProjectionRow {
    fn from(p: &GrowthProjection) -> Self {
        Self {
            year: p.year,
            vcpu: p.vcpu,
            memory: format_gib(p.memory as f64),
            disk: format_gib(p.disk as f64),
        }
    }
}

/// Workload count for one cluster
#[derive(Serialize)]
struct ClusterCount {
    cluster: Cluster,
    workloads: usize,
    hardware: usize,
}

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Workloads")]
    workloads: usize,
    #[tabled(rename = "Hardware")]
    hardware: usize,
}

/// Show the solution view for a cluster
pub fn show_summary(session: &Session, cluster: Option<Cluster>) -> Result<()> {
    let cluster = session.cluster(cluster);
    let summary = session
        .engine
        .summarize(&session.store, cluster, session.current_year);
    session.logger.log_summary(&summary);

    match session.format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_summary_table(&session.store.project_name(), &summary),
    }
    Ok(())
}

fn print_summary_table(project: &str, summary: &SizingSummary) {
    print_heading(&format!("{}: {}", project, summary.cluster), '=');
    println!("Workloads: {}", summary.workload_count);
    println!();

    let gauges: Vec<GaugeRow> = summary
        .utilization
        .gauges()
        .into_iter()
        .map(|(label, gauge)| GaugeRow {
            resource: label.to_string(),
            used: format_quantity(gauge.used),
            total: format_quantity(gauge.total),
            usage: color_usage(gauge.usage),
            status: color_tier(gauge.tier()),
        })
        .collect();
    println!("{}", render_table(gauges));
    println!();

    print_heading("Capacity", '-');
    println!(
        "Supply: {} vCPU, {} memory, {} disk",
        summary.supply.vcpus,
        format_gib(summary.supply.memory as f64),
        format_gib(summary.supply.disk as f64)
    );
    println!(
        "Demand: {} pods, {} vCPU, {} memory, {} data",
        summary.demand.pods,
        format_quantity(summary.demand.cpu),
        format_gib(summary.demand.memory),
        format_gib(summary.demand.disk)
    );
    println!();

    print_heading("License", '-');
    println!("Tier:  {}", summary.license_tier);
    println!("Cores: {}", summary.license_cores);
}

/// Show projected supply for a cluster
pub fn show_forecast(session: &Session, cluster: Option<Cluster>) -> Result<()> {
    let cluster = session.cluster(cluster);
    let projections = session
        .engine
        .projections(&session.store, cluster, session.current_year);

    if matches!(session.format, OutputFormat::Table) {
        print_heading(&format!("Growth forecast: {}", cluster), '=');
    }
    print_list(
        &projections,
        |items| items.iter().map(ProjectionRow::from).collect(),
        "No projection available",
        session.format,
    )
}

/// Show how many records each cluster holds
pub fn list_clusters(session: &Session) -> Result<()> {
    let counts: Vec<ClusterCount> = Cluster::ALL
        .iter()
        .map(|&cluster| ClusterCount {
            cluster,
            workloads: session.store.workloads(Some(cluster)).len(),
            hardware: session.store.hardware(Some(cluster)).len(),
        })
        .collect();

    print_list(
        &counts,
        |items| {
            items
                .iter()
                .map(|c| ClusterRow {
                    cluster: c.cluster.to_string(),
                    workloads: c.workloads,
                    hardware: c.hardware,
                })
                .collect()
        },
        "No clusters",
        session.format,
    )
}

/// Print every cluster's figures in the Prometheus text format
pub fn export_metrics(session: &Session) -> Result<()> {
    let metrics = SizingMetrics::new();
    for cluster in Cluster::ALL {
        let summary = session
            .engine
            .summarize(&session.store, cluster, session.current_year);
        metrics.record_summary(&summary);
    }

    let text = metrics.render().context("Failed to encode metrics")?;
    print!("{}", text);
    Ok(())
}
