//! Sizing aggregation engine
//!
//! This module provides:
//! - Supply and demand totals per cluster, plus the global license core count
//! - Utilization gauges with capacity tiers
//! - Growth table maintenance and multi-year projection
//!
//! Every function here is pure. [`SizingEngine`] ties them together over the
//! read half of the repository interface.

mod growth;
mod totals;
mod utilization;

pub use growth::{
    current_year, project_growth, remove_growth_rate, upsert_growth_rate, GrowthProjection,
    GrowthTable, DEFAULT_HORIZON_YEARS, GROWTH_ENTRY_SPAN_YEARS, MAX_HORIZON_YEARS,
};
pub use totals::{
    compute_demand_totals, compute_license_cores, compute_supply_totals, count_workloads,
    DemandTotals, SupplyTotals,
};
pub use utilization::{
    compute_utilization, CapacityTier, ResourceUsage, Utilization, UtilizationScorer,
    DEFAULT_PODS_PER_VCPU, MAX_PODS_PER_VCPU,
};

use serde::{Deserialize, Serialize};

use crate::models::{Cluster, LicenseTier};
use crate::store::SizingSource;

/// Everything shown for one cluster on the solution view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingSummary {
    pub cluster: Cluster,
    pub workload_count: usize,
    pub supply: SupplyTotals,
    pub demand: DemandTotals,
    pub utilization: Utilization,
    pub license_tier: LicenseTier,
    pub license_cores: u64,
    pub projections: Vec<GrowthProjection>,
}

/// Sizing engine configuration plus the summary entry point
#[derive(Debug, Clone, Copy)]
pub struct SizingEngine {
    pub scorer: UtilizationScorer,
    pub horizon_years: u32,
}

impl Default for SizingEngine {
    fn default() -> Self {
        Self {
            scorer: UtilizationScorer::default(),
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

impl SizingEngine {
    pub fn new(pods_per_vcpu: u64, horizon_years: u32) -> Self {
        Self {
            scorer: UtilizationScorer::new(pods_per_vcpu),
            horizon_years,
        }
    }

    /// Supply totals for a cluster
    pub fn supply<S: SizingSource + ?Sized>(&self, source: &S, cluster: Cluster) -> SupplyTotals {
        compute_supply_totals(&source.hardware(Some(cluster)), cluster)
    }

    /// Growth projection of a cluster's supply
    pub fn projections<S: SizingSource + ?Sized>(
        &self,
        source: &S,
        cluster: Cluster,
        current_year: i32,
    ) -> Vec<GrowthProjection> {
        project_growth(
            &self.supply(source, cluster),
            &source.growth_table(),
            current_year,
            self.horizon_years,
        )
    }

    /// Build the full summary for a cluster
    pub fn summarize<S: SizingSource + ?Sized>(
        &self,
        source: &S,
        cluster: Cluster,
        current_year: i32,
    ) -> SizingSummary {
        let hardware = source.hardware(None);
        let workloads = source.workloads(Some(cluster));

        let supply = compute_supply_totals(&hardware, cluster);
        let demand = compute_demand_totals(&workloads, cluster);
        let utilization = self.scorer.score(&demand, &supply);
        let projections = project_growth(
            &supply,
            &source.growth_table(),
            current_year,
            self.horizon_years,
        );

        tracing::debug!(
            cluster = %cluster,
            vcpus = supply.vcpus,
            pods = demand.pods,
            cpu_usage = utilization.cpu.usage,
            "Computed sizing summary"
        );

        SizingSummary {
            cluster,
            workload_count: count_workloads(&workloads, cluster),
            supply,
            demand,
            utilization,
            license_tier: source.license(),
            license_cores: compute_license_cores(&hardware),
            projections,
        }
    }
}
