//! Project storage behind a repository interface
//!
//! The sizing engine only ever reads through [`SizingSource`]. Record
//! creation, editing, and deletion go through [`SizingStore`], which callers
//! invoke once a change has been confirmed.

mod json;
mod memory;
mod project;


pub use json::{JsonFileStore, PROJECT_FILE_NAME};
pub use memory::MemoryStore;
pub use project::{Project, DEFAULT_PROJECT_NAME};

use crate::engine::GrowthTable;
use crate::error::Result;
use crate::models::{
    Cluster, HardwareConfig, HardwareSpec, LicenseTier, WorkloadRecord, WorkloadSpec,
};

/// Read access to sizing records
pub trait SizingSource {
    /// Workloads, optionally restricted to one cluster
    fn workloads(&self, cluster: Option<Cluster>) -> Vec<WorkloadRecord>;

    /// Hardware configurations, optionally restricted to one cluster
    fn hardware(&self, cluster: Option<Cluster>) -> Vec<HardwareConfig>;

    /// The global growth rate table
    fn growth_table(&self) -> GrowthTable;

    fn license(&self) -> LicenseTier;

    fn project_name(&self) -> String;
}

/// Write access to sizing records
pub trait SizingStore: SizingSource {
    fn add_workload(&mut self, spec: WorkloadSpec) -> Result<WorkloadRecord>;

    fn update_workload(&mut self, id: u64, spec: WorkloadSpec) -> Result<WorkloadRecord>;

    fn remove_workload(&mut self, id: u64) -> Result<WorkloadRecord>;

    fn add_hardware(&mut self, spec: HardwareSpec) -> Result<HardwareConfig>;

    fn update_hardware(&mut self, id: u64, spec: HardwareSpec) -> Result<HardwareConfig>;

    fn remove_hardware(&mut self, id: u64) -> Result<HardwareConfig>;

    /// Insert or replace the growth rate for a year
    fn upsert_growth_rate(&mut self, year: i32, rate: f64) -> Result<()>;

    /// Remove the growth rate for a year, returning whether one existed
    fn remove_growth_rate(&mut self, year: i32) -> Result<bool>;

    fn set_license(&mut self, license: LicenseTier) -> Result<()>;

    /// Rename the project; blank names fall back to the default
    fn set_project_name(&mut self, name: &str) -> Result<String>;

    /// Discard every record and reseed the project
    fn reset(&mut self, current_year: i32) -> Result<()>;
}
