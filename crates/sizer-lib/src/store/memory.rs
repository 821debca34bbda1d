//! In-memory store

use super::{Project, SizingSource, SizingStore};
use crate::engine::GrowthTable;
use crate::error::Result;
use crate::models::{
    Cluster, HardwareConfig, HardwareSpec, LicenseTier, WorkloadRecord, WorkloadSpec,
};

/// Store that keeps the project in memory only
#[derive(Debug, Clone)]
pub struct MemoryStore {
    project: Project,
}

impl MemoryStore {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn seeded(current_year: i32) -> Self {
        Self::new(Project::seeded(current_year))
    }

    pub fn project(&self) -> &Project {
        &self.project
    }
}

impl SizingSource for MemoryStore {
    fn workloads(&self, cluster: Option<Cluster>) -> Vec<WorkloadRecord> {
        self.project.workloads_in(cluster)
    }

    fn hardware(&self, cluster: Option<Cluster>) -> Vec<HardwareConfig> {
        self.project.hardware_in(cluster)
    }

    fn growth_table(&self) -> GrowthTable {
        self.project.growth.clone()
    }

    fn license(&self) -> LicenseTier {
        self.project.license
    }

    fn project_name(&self) -> String {
        self.project.name.clone()
    }
}

impl SizingStore for MemoryStore {
    fn add_workload(&mut self, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        self.project.add_workload(spec)
    }

    fn update_workload(&mut self, id: u64, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        self.project.update_workload(id, spec)
    }

    fn remove_workload(&mut self, id: u64) -> Result<WorkloadRecord> {
        self.project.remove_workload(id)
    }

    fn add_hardware(&mut self, spec: HardwareSpec) -> Result<HardwareConfig> {
        self.project.add_hardware(spec)
    }

    fn update_hardware(&mut self, id: u64, spec: HardwareSpec) -> Result<HardwareConfig> {
        self.project.update_hardware(id, spec)
    }

    fn remove_hardware(&mut self, id: u64) -> Result<HardwareConfig> {
        self.project.remove_hardware(id)
    }

    fn upsert_growth_rate(&mut self, year: i32, rate: f64) -> Result<()> {
        self.project.growth.upsert(year, rate)
    }

    fn remove_growth_rate(&mut self, year: i32) -> Result<bool> {
        Ok(self.project.growth.remove(year).is_some())
    }

    fn set_license(&mut self, license: LicenseTier) -> Result<()> {
        self.project.license = license;
        Ok(())
    }

    fn set_project_name(&mut self, name: &str) -> Result<String> {
        Ok(self.project.rename(name))
    }

    fn reset(&mut self, current_year: i32) -> Result<()> {
        self.project = Project::seeded(current_year);
        Ok(())
    }
}
