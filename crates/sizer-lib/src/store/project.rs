//! The persisted project document

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::engine::GrowthTable;
use crate::error::{Result, SizingError};
use crate::models::{
    Cluster, GrowthRatePoint, HardwareConfig, HardwareSpec, LicenseTier, WorkloadRecord,
    WorkloadSpec,
};

pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// All sizing records of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub license: LicenseTier,
    #[serde(default)]
    pub hardware: Vec<HardwareConfig>,
    #[serde(default)]
    pub workloads: Vec<WorkloadRecord>,
    #[serde(default)]
    pub growth: GrowthTable,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl Project {
    /// A fresh project with management hardware and default growth rates
    pub fn seeded(current_year: i32) -> Self {
        let mut project = Self {
            name: default_project_name(),
            license: LicenseTier::default(),
            hardware: Vec::new(),
            workloads: Vec::new(),
            growth: GrowthTable::default_for(current_year),
        };
        project.ensure_management_hardware();
        project
    }

    /// Re-add the management cluster hardware if it is missing.
    ///
    /// Returns true when the project was modified.
    pub fn ensure_management_hardware(&mut self) -> bool {
        if self
            .hardware
            .iter()
            .any(|h| h.spec.cluster == Cluster::NkpManagement)
        {
            return false;
        }
        let id = next_id(self.hardware.iter().map(|h| h.id));
        self.hardware.push(HardwareConfig {
            id,
            spec: HardwareSpec::management_default(),
        });
        true
    }

    /// Check every record, e.g. after loading from disk
    pub fn validate(&self) -> Result<()> {
        for w in &self.workloads {
            w.spec.validate()?;
        }
        for h in &self.hardware {
            h.spec.validate()?;
        }
        ensure_unique_ids("workload", self.workloads.iter().map(|w| w.id))?;
        ensure_unique_ids("hardware", self.hardware.iter().map(|h| h.id))?;
        for p in self.growth.points() {
            GrowthRatePoint::new(p.year, p.rate)?;
        }
        Ok(())
    }

    pub fn workloads_in(&self, cluster: Option<Cluster>) -> Vec<WorkloadRecord> {
        self.workloads
            .iter()
            .filter(|w| cluster.map_or(true, |c| w.spec.cluster == c))
            .cloned()
            .collect()
    }

    pub fn hardware_in(&self, cluster: Option<Cluster>) -> Vec<HardwareConfig> {
        self.hardware
            .iter()
            .filter(|h| cluster.map_or(true, |c| h.spec.cluster == c))
            .cloned()
            .collect()
    }

    pub fn add_workload(&mut self, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        let id = next_id(self.workloads.iter().map(|w| w.id));
        let record = WorkloadRecord::new(id, spec)?;
        self.workloads.push(record.clone());
        Ok(record)
    }

    pub fn update_workload(&mut self, id: u64, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        let record = WorkloadRecord::new(id, spec)?;
        let slot = self
            .workloads
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(SizingError::NotFound { kind: "workload", id })?;
        *slot = record.clone();
        Ok(record)
    }

    pub fn remove_workload(&mut self, id: u64) -> Result<WorkloadRecord> {
        let idx = self
            .workloads
            .iter()
            .position(|w| w.id == id)
            .ok_or(SizingError::NotFound { kind: "workload", id })?;
        Ok(self.workloads.remove(idx))
    }

    pub fn add_hardware(&mut self, spec: HardwareSpec) -> Result<HardwareConfig> {
        let id = next_id(self.hardware.iter().map(|h| h.id));
        let record = HardwareConfig::new(id, spec)?;
        self.hardware.push(record.clone());
        Ok(record)
    }

    pub fn update_hardware(&mut self, id: u64, spec: HardwareSpec) -> Result<HardwareConfig> {
        let record = HardwareConfig::new(id, spec)?;
        let slot = self
            .hardware
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(SizingError::NotFound { kind: "hardware", id })?;
        *slot = record.clone();
        Ok(record)
    }

    pub fn remove_hardware(&mut self, id: u64) -> Result<HardwareConfig> {
        let idx = self
            .hardware
            .iter()
            .position(|h| h.id == id)
            .ok_or(SizingError::NotFound { kind: "hardware", id })?;
        Ok(self.hardware.remove(idx))
    }

    /// Rename the project, falling back to the default for blank names
    pub fn rename(&mut self, name: &str) -> String {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            default_project_name()
        } else {
            trimmed.to_string()
        };
        self.name.clone()
    }
}

fn ensure_unique_ids(kind: &str, ids: impl Iterator<Item = u64>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SizingError::invalid(
                "id",
                format!("duplicate {} id {}", kind, id),
            ));
        }
    }
    Ok(())
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}
