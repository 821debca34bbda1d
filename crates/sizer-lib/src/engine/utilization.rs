//! Utilization scoring
//!
//! Turns demand/supply pairs into bounded percentages and capacity tiers
//! for the sizing gauges.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::totals::{DemandTotals, SupplyTotals};

/// Assumed pod density per vCPU of supply
pub const DEFAULT_PODS_PER_VCPU: u64 = 10;

/// Highest pod density accepted from configuration
pub const MAX_PODS_PER_VCPU: u64 = 1_000;

/// Usage at or below this percentage is healthy
const GOOD_THRESHOLD: u8 = 60;

/// Usage at or below this percentage (and above good) is a warning
const WARNING_THRESHOLD: u8 = 80;

/// Capacity classification of a usage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityTier {
    Good,
    Warning,
    OverCapacity,
}

impl CapacityTier {
    pub fn from_usage(usage: u8) -> Self {
        if usage > WARNING_THRESHOLD {
            CapacityTier::OverCapacity
        } else if usage > GOOD_THRESHOLD {
            CapacityTier::Warning
        } else {
            CapacityTier::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CapacityTier::Good => "good",
            CapacityTier::Warning => "warning",
            CapacityTier::OverCapacity => "over capacity",
        }
    }
}

impl fmt::Display for CapacityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One gauge: usage percentage plus the figures it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Rounded percentage in 0..=100
    pub usage: u8,
    pub used: f64,
    pub total: f64,
}

impl ResourceUsage {
    fn score(used: f64, total: f64) -> Self {
        let usage = if total > 0.0 {
            (used / total * 100.0).clamp(0.0, 100.0).round() as u8
        } else {
            0
        };
        Self { usage, used, total }
    }

    pub fn tier(&self) -> CapacityTier {
        CapacityTier::from_usage(self.usage)
    }
}

/// Gauges for every sized dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    pub pod: ResourceUsage,
    pub cpu: ResourceUsage,
    pub ram: ResourceUsage,
    pub data: ResourceUsage,
}

impl Utilization {
    /// Gauges paired with their display labels
    pub fn gauges(&self) -> [(&'static str, &ResourceUsage); 4] {
        [
            ("POD", &self.pod),
            ("CPU", &self.cpu),
            ("RAM", &self.ram),
            ("Disk (GiB)", &self.data),
        ]
    }
}

/// Scores demand against supply
#[derive(Debug, Clone, Copy)]
pub struct UtilizationScorer {
    pub pods_per_vcpu: u64,
}

impl UtilizationScorer {
    pub fn new(pods_per_vcpu: u64) -> Self {
        Self { pods_per_vcpu }
    }

    pub fn score(&self, demand: &DemandTotals, supply: &SupplyTotals) -> Utilization {
        // Pod capacity only exists when there is vCPU supply
        let pod_capacity = if supply.vcpus > 0 {
            supply.vcpus as f64 * self.pods_per_vcpu as f64
        } else {
            0.0
        };

        Utilization {
            pod: ResourceUsage::score(demand.pods as f64, pod_capacity),
            cpu: ResourceUsage::score(demand.cpu, supply.vcpus as f64),
            ram: ResourceUsage::score(demand.memory, supply.memory as f64),
            data: ResourceUsage::score(demand.disk, supply.disk as f64),
        }
    }
}

impl Default for UtilizationScorer {
    fn default() -> Self {
        Self::new(DEFAULT_PODS_PER_VCPU)
    }
}

/// Score demand against supply using the default pod density
pub fn compute_utilization(demand: &DemandTotals, supply: &SupplyTotals) -> Utilization {
    UtilizationScorer::default().score(demand, supply)
}
