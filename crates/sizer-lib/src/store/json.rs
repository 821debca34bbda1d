//! JSON file store
//!
//! Keeps the whole project in memory and rewrites `project.json` after every
//! mutation. Writes go to a temp file that is then renamed over the original.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Project, SizingSource, SizingStore};
use crate::engine::GrowthTable;
use crate::error::{Result, SizingError};
use crate::models::{
    Cluster, HardwareConfig, HardwareSpec, LicenseTier, WorkloadRecord, WorkloadSpec,
};

/// File name of the project document inside the data directory
pub const PROJECT_FILE_NAME: &str = "project.json";

/// Store persisting the project as a JSON document
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    project: Project,
}

impl JsonFileStore {
    /// Open `project.json` inside `data_dir`, seeding it if absent
    pub fn open(data_dir: &Path, current_year: i32) -> Result<Self> {
        Self::open_file(data_dir.join(PROJECT_FILE_NAME), current_year)
    }

    /// Open a specific project file, seeding it if absent
    pub fn open_file(path: PathBuf, current_year: i32) -> Result<Self> {
        if !path.exists() {
            let store = Self {
                path,
                project: Project::seeded(current_year),
            };
            store.save(&store.project)?;
            info!(path = %store.path.display(), "Created new project");
            return Ok(store);
        }

        let mut project = load_from_disk(&path)?;
        project.validate()?;

        let store_needs_save = project.ensure_management_hardware();
        let store = Self { path, project };
        if store_needs_save {
            debug!("Re-added management cluster hardware");
            store.save(&store.project)?;
        }

        info!(
            path = %store.path.display(),
            workloads = store.project.workloads.len(),
            hardware = store.project.hardware.len(),
            "Loaded project"
        );
        Ok(store)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Apply a change to a copy of the project, keeping it only once saved
    fn commit<T>(&mut self, change: impl FnOnce(&mut Project) -> Result<T>) -> Result<T> {
        let mut next = self.project.clone();
        let output = change(&mut next)?;
        self.save(&next)?;
        self.project = next;
        Ok(output)
    }

    /// Write a project to disk atomically
    fn save(&self, project: &Project) -> Result<()> {
        let io_err = |source| SizingError::Store {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(project).map_err(|source| {
            SizingError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&temp_path, &self.path).map_err(io_err)?;

        debug!(path = %self.path.display(), bytes = json.len(), "Project saved");
        Ok(())
    }
}

fn load_from_disk(path: &Path) -> Result<Project> {
    let data = fs::read(path).map_err(|source| SizingError::Store {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| SizingError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

impl SizingSource for JsonFileStore {
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

impl SizingStore for JsonFileStore {
    fn add_workload(&mut self, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        self.commit(|project| project.add_workload(spec))
    }

    fn update_workload(&mut self, id: u64, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        self.commit(|project| project.update_workload(id, spec))
    }

    fn remove_workload(&mut self, id: u64) -> Result<WorkloadRecord> {
        self.commit(|project| project.remove_workload(id))
    }

    fn add_hardware(&mut self, spec: HardwareSpec) -> Result<HardwareConfig> {
        self.commit(|project| project.add_hardware(spec))
    }

    fn update_hardware(&mut self, id: u64, spec: HardwareSpec) -> Result<HardwareConfig> {
        self.commit(|project| project.update_hardware(id, spec))
    }

    fn remove_hardware(&mut self, id: u64) -> Result<HardwareConfig> {
        self.commit(|project| project.remove_hardware(id))
    }

    fn upsert_growth_rate(&mut self, year: i32, rate: f64) -> Result<()> {
        self.commit(|project| project.growth.upsert(year, rate))
    }

    fn remove_growth_rate(&mut self, year: i32) -> Result<bool> {
        if !self.project.growth.contains(year) {
            return Ok(false);
        }
        self.commit(|project| Ok(project.growth.remove(year).is_some()))
    }

    fn set_license(&mut self, license: LicenseTier) -> Result<()> {
        self.commit(|project| {
            project.license = license;
            Ok(())
        })
    }

    fn set_project_name(&mut self, name: &str) -> Result<String> {
        self.commit(|project| Ok(project.rename(name)))
    }

    fn reset(&mut self, current_year: i32) -> Result<()> {
        self.commit(|project| {
            *project = Project::seeded(current_year);
            Ok(())
        })
    }
}
