//! Observability infrastructure for the sizer
//!
//! Provides:
//! - Prometheus gauges for supply, demand, utilization, and license cores
//! - Structured logging of record changes and sizing results with tracing

use prometheus::{
    register_gauge_vec, register_int_gauge, register_int_gauge_vec, Encoder, GaugeVec, IntGauge,
    IntGaugeVec, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::engine::{CapacityTier, SizingSummary};
use crate::models::Cluster;

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SizingMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct SizingMetricsInner {
    supply: GaugeVec,
    demand: GaugeVec,
    utilization_percent: IntGaugeVec,
    projected_supply: GaugeVec,
    workloads: IntGaugeVec,
    license_cores: IntGauge,
}

impl SizingMetricsInner {
    fn new() -> Self {
        Self {
            supply: register_gauge_vec!(
                "nkp_sizer_supply",
                "Hardware supply per cluster (vCPU count, memory and disk in GiB)",
                &["cluster", "resource"]
            )
            .expect("Failed to register supply"),

            demand: register_gauge_vec!(
                "nkp_sizer_demand",
                "Workload demand per cluster (pods, vCPU, memory and disk in GiB)",
                &["cluster", "resource"]
            )
            .expect("Failed to register demand"),

            utilization_percent: register_int_gauge_vec!(
                "nkp_sizer_utilization_percent",
                "Demand as a percentage of supply, clamped to 0-100",
                &["cluster", "dimension"]
            )
            .expect("Failed to register utilization_percent"),

            projected_supply: register_gauge_vec!(
                "nkp_sizer_projected_supply",
                "Projected hardware supply per cluster and year",
                &["cluster", "year", "resource"]
            )
            .expect("Failed to register projected_supply"),

            workloads: register_int_gauge_vec!(
                "nkp_sizer_workloads",
                "Number of workload records per cluster",
                &["cluster"]
            )
            .expect("Failed to register workloads"),

            license_cores: register_int_gauge!(
                "nkp_sizer_license_cores",
                "Worker cores across all clusters counted for licensing"
            )
            .expect("Failed to register license_cores"),
        }
    }
}

/// Sizing metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct SizingMetrics {
    _private: (),
}

impl Default for SizingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SizingMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SizingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SizingMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Publish every figure of a cluster summary
    pub fn record_summary(&self, summary: &SizingSummary) {
        let inner = self.inner();
        let cluster = summary.cluster.name();

        for (resource, value) in [
            ("vcpu", summary.supply.vcpus as f64),
            ("memory_gib", summary.supply.memory as f64),
            ("disk_gib", summary.supply.disk as f64),
        ] {
            inner
                .supply
                .with_label_values(&[cluster, resource])
                .set(value);
        }

        for (resource, value) in [
            ("pods", summary.demand.pods as f64),
            ("vcpu", summary.demand.cpu),
            ("memory_gib", summary.demand.memory),
            ("disk_gib", summary.demand.disk),
        ] {
            inner
                .demand
                .with_label_values(&[cluster, resource])
                .set(value);
        }

        for (dimension, gauge) in [
            ("pod", &summary.utilization.pod),
            ("cpu", &summary.utilization.cpu),
            ("ram", &summary.utilization.ram),
            ("data", &summary.utilization.data),
        ] {
            inner
                .utilization_percent
                .with_label_values(&[cluster, dimension])
                .set(i64::from(gauge.usage));
        }

        for projection in &summary.projections {
            let year = projection.year.to_string();
            for (resource, value) in [
                ("vcpu", projection.vcpu),
                ("memory_gib", projection.memory),
                ("disk_gib", projection.disk),
            ] {
                inner
                    .projected_supply
                    .with_label_values(&[cluster, &year, resource])
                    .set(value as f64);
            }
        }

        inner
            .workloads
            .with_label_values(&[cluster])
            .set(summary.workload_count as i64);
        inner.license_cores.set(summary.license_cores as i64);
    }

    /// Render the default registry in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for sizing events
///
/// Provides consistent logging for record changes and sizing results,
/// tagged with the project they belong to.
#[derive(Clone)]
pub struct StructuredLogger {
    project: String,
}

impl StructuredLogger {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }

    /// Log a created record
    pub fn log_record_added(&self, kind: &str, id: u64, name: &str, cluster: Cluster) {
        info!(
            event = "record_added",
            project = %self.project,
            kind = %kind,
            id = id,
            name = %name,
            cluster = %cluster,
            "Record added"
        );
    }

    /// Log an edited record
    pub fn log_record_updated(&self, kind: &str, id: u64, name: &str, cluster: Cluster) {
        info!(
            event = "record_updated",
            project = %self.project,
            kind = %kind,
            id = id,
            name = %name,
            cluster = %cluster,
            "Record updated"
        );
    }

    /// Log a deleted record
    pub fn log_record_removed(&self, kind: &str, id: u64, name: &str) {
        info!(
            event = "record_removed",
            project = %self.project,
            kind = %kind,
            id = id,
            name = %name,
            "Record removed"
        );
    }

    /// Log a growth table change; `rate` is None when the year was removed
    pub fn log_growth_rate_changed(&self, year: i32, rate: Option<f64>) {
        info!(
            event = "growth_rate_changed",
            project = %self.project,
            year = year,
            rate = ?rate,
            "Growth rate changed"
        );
    }

    /// Log a license or project name change
    pub fn log_setting_changed(&self, setting: &str, value: &str) {
        info!(
            event = "setting_changed",
            project = %self.project,
            setting = %setting,
            value = %value,
            "Project setting changed"
        );
    }

    /// Log a project reset
    pub fn log_reset(&self) {
        warn!(
            event = "project_reset",
            project = %self.project,
            "Project reset, all records cleared"
        );
    }

    /// Log a computed summary, warning when any dimension is over capacity
    pub fn log_summary(&self, summary: &SizingSummary) {
        let over: Vec<&str> = summary
            .utilization
            .gauges()
            .iter()
            .filter(|(_, gauge)| gauge.tier() == CapacityTier::OverCapacity)
            .map(|(label, _)| *label)
            .collect();

        if over.is_empty() {
            info!(
                event = "sizing_summary",
                project = %self.project,
                cluster = %summary.cluster,
                pod_usage = summary.utilization.pod.usage,
                cpu_usage = summary.utilization.cpu.usage,
                ram_usage = summary.utilization.ram.usage,
                data_usage = summary.utilization.data.usage,
                "Sizing summary computed"
            );
        } else {
            warn!(
                event = "sizing_summary",
                project = %self.project,
                cluster = %summary.cluster,
                over_capacity = ?over,
                pod_usage = summary.utilization.pod.usage,
                cpu_usage = summary.utilization.cpu.usage,
                ram_usage = summary.utilization.ram.usage,
                data_usage = summary.utilization.data.usage,
                "Cluster is over capacity"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SizingEngine;
    use crate::store::MemoryStore;

    #[test]
    fn test_metrics_render_summary() {
        let store = MemoryStore::seeded(2025);
        let summary = SizingEngine::default().summarize(&store, Cluster::NkpManagement, 2025);

        let metrics = SizingMetrics::new();
        metrics.record_summary(&summary);
        let text = metrics.render().unwrap();

        assert!(text.contains("nkp_sizer_license_cores 32"));
        assert!(text.contains(
            "nkp_sizer_supply{cluster=\"NKP Management\",resource=\"vcpu\"} 44"
        ));
        assert!(text.contains("nkp_sizer_utilization_percent"));
        assert!(text.contains("year=\"2030\""));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-project");
        assert_eq!(logger.project, "test-project");
    }
}
