//! Supply and demand aggregation
//!
//! Reduces hardware configurations into supply totals and workloads into
//! demand totals, both scoped to a single cluster.

use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::models::{Cluster, HardwareConfig, WorkloadRecord};

/// Resources provided by a cluster's hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplyTotals {
    pub vcpus: u64,
    /// GiB
    pub memory: u64,
    /// GiB
    pub disk: u64,
}

impl SupplyTotals {
    /// Supply contributed by a single hardware configuration
    ///
    /// Sums saturate at `u64::MAX` instead of overflowing.
    pub fn of(hardware: &HardwareConfig) -> Self {
        let spec = &hardware.spec;
        Self {
            vcpus: spec
                .control_plane
                .total_vcpus()
                .saturating_add(spec.worker.total_vcpus())
                .saturating_add(u64::from(spec.reserved.vcpus)),
            memory: spec
                .control_plane
                .total_memory_gib()
                .saturating_add(spec.worker.total_memory_gib())
                .saturating_add(u64::from(spec.reserved.memory_gib)),
            // Reserved disk is not modeled
            disk: spec
                .control_plane
                .total_disk_gib()
                .saturating_add(spec.worker.total_disk_gib()),
        }
    }
}

impl Add for SupplyTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            vcpus: self.vcpus.saturating_add(rhs.vcpus),
            memory: self.memory.saturating_add(rhs.memory),
            disk: self.disk.saturating_add(rhs.disk),
        }
    }
}

/// Resources requested by a cluster's workloads
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandTotals {
    pub pods: u64,
    pub cpu: f64,
    /// GiB
    pub memory: f64,
    /// GiB
    pub disk: f64,
}

impl Add for DemandTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            pods: self.pods.saturating_add(rhs.pods),
            cpu: self.cpu + rhs.cpu,
            memory: self.memory + rhs.memory,
            disk: self.disk + rhs.disk,
        }
    }
}

/// Sum hardware supply for one cluster
pub fn compute_supply_totals(hardware: &[HardwareConfig], cluster: Cluster) -> SupplyTotals {
    hardware
        .iter()
        .filter(|h| h.spec.cluster == cluster)
        .map(SupplyTotals::of)
        .fold(SupplyTotals::default(), Add::add)
}

/// Sum workload demand for one cluster
pub fn compute_demand_totals(workloads: &[WorkloadRecord], cluster: Cluster) -> DemandTotals {
    workloads
        .iter()
        .filter(|w| w.spec.cluster == cluster)
        .map(|w| DemandTotals {
            pods: u64::from(w.spec.replicas),
            cpu: w.spec.cpu,
            memory: w.spec.memory_gib,
            disk: w.spec.data_gib,
        })
        .fold(DemandTotals::default(), Add::add)
}

/// Worker cores across every cluster, used for license sizing
pub fn compute_license_cores(hardware: &[HardwareConfig]) -> u64 {
    hardware
        .iter()
        .map(|h| h.spec.worker.total_vcpus())
        .fold(0, u64::saturating_add)
}

/// Number of workload records assigned to a cluster
pub fn count_workloads(workloads: &[WorkloadRecord], cluster: Cluster) -> usize {
    workloads.iter().filter(|w| w.spec.cluster == cluster).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HardwareSpec, NodeSpec, ReservedResources, WorkloadSpec, WorkloadType};

    fn hardware(id: u64, cluster: Cluster, worker: NodeSpec) -> HardwareConfig {
        HardwareConfig {
            id,
            spec: HardwareSpec {
                name: format!("hw-{}", id),
                cluster,
                control_plane: NodeSpec::new(3, 4, 16, 80),
                worker,
                reserved: ReservedResources {
                    vcpus: 12,
                    memory_gib: 15,
                },
            },
        }
    }

    fn workload(id: u64, cluster: Cluster, replicas: u32, cpu: f64) -> WorkloadRecord {
        WorkloadRecord {
            id,
            spec: WorkloadSpec {
                name: format!("wl-{}", id),
                workload_type: WorkloadType::Container,
                cluster,
                replicas,
                cpu,
                memory_gib: 2.5,
                data_gib: 10.0,
            },
        }
    }

    #[test]
    fn test_supply_totals_formula() {
        let hw = vec![hardware(1, Cluster::Production, NodeSpec::new(4, 8, 32, 100))];
        let totals = compute_supply_totals(&hw, Cluster::Production);

        // 3*4 + 4*8 + 12
        assert_eq!(totals.vcpus, 56);
        // 3*16 + 4*32 + 15
        assert_eq!(totals.memory, 191);
        // 3*80 + 4*100, reserved not counted
        assert_eq!(totals.disk, 640);
    }

    #[test]
    fn test_supply_totals_empty_cluster() {
        let hw = vec![hardware(1, Cluster::Production, NodeSpec::new(4, 8, 32, 100))];
        assert_eq!(compute_supply_totals(&hw, Cluster::Dr), SupplyTotals::default());
        assert_eq!(compute_supply_totals(&[], Cluster::Dr), SupplyTotals::default());
    }

    #[test]
    fn test_supply_totals_additive_over_partitions() {
        let hw: Vec<_> = (1..=5)
            .map(|i| {
                let cluster = if i % 2 == 0 { Cluster::Dev } else { Cluster::Uat };
                hardware(i, cluster, NodeSpec::new(i as u32, 8, 32, 100))
            })
            .collect();

        let whole = compute_supply_totals(&hw, Cluster::Uat);
        let (left, right) = hw.split_at(2);
        let parts =
            compute_supply_totals(left, Cluster::Uat) + compute_supply_totals(right, Cluster::Uat);
        assert_eq!(whole, parts);
    }

    #[test]
    fn test_demand_totals() {
        let workloads = vec![
            workload(1, Cluster::Production, 3, 1.5),
            workload(2, Cluster::Production, 2, 2.0),
            workload(3, Cluster::Dev, 10, 8.0),
        ];
        let demand = compute_demand_totals(&workloads, Cluster::Production);

        assert_eq!(demand.pods, 5);
        assert!((demand.cpu - 3.5).abs() < f64::EPSILON);
        assert!((demand.memory - 5.0).abs() < f64::EPSILON);
        assert!((demand.disk - 20.0).abs() < f64::EPSILON);

        assert_eq!(
            compute_demand_totals(&workloads, Cluster::Sit),
            DemandTotals::default()
        );
        assert_eq!(count_workloads(&workloads, Cluster::Production), 2);
        assert_eq!(count_workloads(&workloads, Cluster::Sit), 0);
    }

    #[test]
    fn test_license_cores_span_all_clusters() {
        let hw = vec![
            hardware(1, Cluster::Production, NodeSpec::new(4, 8, 32, 100)),
            hardware(2, Cluster::Dev, NodeSpec::new(2, 4, 16, 100)),
        ];
        assert_eq!(compute_license_cores(&hw), 40);
        assert_eq!(compute_license_cores(&[]), 0);
    }

    #[test]
    fn test_huge_node_counts_saturate() {
        let huge = NodeSpec::new(u32::MAX, u32::MAX, 1, 1);
        let mut record = hardware(1, Cluster::Dev, huge);
        record.spec.control_plane = huge;
        let hw = vec![record.clone(), HardwareConfig { id: 2, ..record }];

        let totals = compute_supply_totals(&hw, Cluster::Dev);
        assert_eq!(totals.vcpus, u64::MAX);
        assert_eq!(totals.memory, 4 * u64::from(u32::MAX) + 30);
        assert_eq!(compute_license_cores(&hw), u64::MAX);
    }
}
