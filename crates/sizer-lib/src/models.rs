//! Core data models for cluster sizing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SizingError};

/// Name given to the management cluster hardware seeded into every project
pub const MANAGEMENT_HARDWARE_NAME: &str = "NKP Management Cluster";

/// Minimum control plane nodes for production-tier clusters
pub const MIN_HA_CONTROL_PLANE_NODES: u32 = 3;

/// Logical cluster a workload or hardware configuration is deployed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cluster {
    #[serde(rename = "NKP Management")]
    NkpManagement,
    Production,
    #[serde(rename = "DR")]
    Dr,
    #[serde(rename = "DEV")]
    Dev,
    #[serde(rename = "UAT")]
    Uat,
    #[serde(rename = "SIT")]
    Sit,
}

impl Cluster {
    /// Every cluster, in display order
    pub const ALL: [Cluster; 6] = [
        Cluster::NkpManagement,
        Cluster::Production,
        Cluster::Dr,
        Cluster::Dev,
        Cluster::Uat,
        Cluster::Sit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Cluster::NkpManagement => "NKP Management",
            Cluster::Production => "Production",
            Cluster::Dr => "DR",
            Cluster::Dev => "DEV",
            Cluster::Uat => "UAT",
            Cluster::Sit => "SIT",
        }
    }

    /// Storage slug used to key workload collections
    pub fn storage_key(&self) -> &'static str {
        match self {
            Cluster::NkpManagement => "nkp_management",
            Cluster::Production => "production_cluster",
            Cluster::Dr => "dr_cluster",
            Cluster::Dev => "development_(dev)",
            Cluster::Uat => "development_(uat)",
            Cluster::Sit => "development_(sit)",
        }
    }

    /// Production and DR clusters carry the control plane quorum requirement
    pub fn is_production_tier(&self) -> bool {
        matches!(self, Cluster::Production | Cluster::Dr)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cluster {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Cluster::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted) || c.storage_key() == wanted)
            .or_else(|| match normalize(wanted).as_str() {
                "nkpmanagement" | "management" => Some(Cluster::NkpManagement),
                "prod" => Some(Cluster::Production),
                _ => None,
            })
            .ok_or_else(|| SizingError::UnknownCluster(s.to_string()))
    }
}

/// Kind of workload being sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadType {
    Container,
    #[serde(rename = "Server Virtualization")]
    ServerVirtualization,
    Database,
}

impl WorkloadType {
    pub fn name(&self) -> &'static str {
        match self {
            WorkloadType::Container => "Container",
            WorkloadType::ServerVirtualization => "Server Virtualization",
            WorkloadType::Database => "Database",
        }
    }
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkloadType {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "container" => Ok(WorkloadType::Container),
            "servervirtualization" | "vm" => Ok(WorkloadType::ServerVirtualization),
            "database" | "db" => Ok(WorkloadType::Database),
            _ => Err(SizingError::UnknownWorkloadType(s.to_string())),
        }
    }
}

/// Platform license tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LicenseTier {
    #[default]
    Starter,
    Pro,
    Ultimate,
}

impl LicenseTier {
    pub fn name(&self) -> &'static str {
        match self {
            LicenseTier::Starter => "Starter",
            LicenseTier::Pro => "Pro",
            LicenseTier::Ultimate => "Ultimate",
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LicenseTier {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "starter" => Ok(LicenseTier::Starter),
            "pro" => Ok(LicenseTier::Pro),
            "ultimate" => Ok(LicenseTier::Ultimate),
            _ => Err(SizingError::UnknownLicense(s.to_string())),
        }
    }
}

/// Workload requirements as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub workload_type: WorkloadType,
    pub cluster: Cluster,
    pub replicas: u32,
    /// vCPU demand
    pub cpu: f64,
    /// Memory demand in GiB
    pub memory_gib: f64,
    /// Data demand in GiB
    pub data_gib: f64,
}

impl WorkloadSpec {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SizingError::invalid("name", "must not be empty"));
        }
        non_negative("cpu", self.cpu)?;
        non_negative("memory", self.memory_gib)?;
        non_negative("data", self.data_gib)?;
        Ok(())
    }
}

/// A stored workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub id: u64,
    #[serde(flatten)]
    pub spec: WorkloadSpec,
}

impl WorkloadRecord {
    pub fn new(id: u64, spec: WorkloadSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self { id, spec })
    }
}

/// Per-node resources for one node role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    pub count: u32,
    pub vcpus: u32,
    pub memory_gib: u32,
    pub disk_gib: u32,
}

impl NodeSpec {
    pub fn new(count: u32, vcpus: u32, memory_gib: u32, disk_gib: u32) -> Self {
        Self {
            count,
            vcpus,
            memory_gib,
            disk_gib,
        }
    }

    pub fn total_vcpus(&self) -> u64 {
        u64::from(self.count) * u64::from(self.vcpus)
    }

    pub fn total_memory_gib(&self) -> u64 {
        u64::from(self.count) * u64::from(self.memory_gib)
    }

    pub fn total_disk_gib(&self) -> u64 {
        u64::from(self.count) * u64::from(self.disk_gib)
    }
}

/// Resources held back from scheduling but still counted as supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservedResources {
    pub vcpus: u32,
    pub memory_gib: u32,
}

/// Hardware configuration as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpec {
    pub name: String,
    pub cluster: Cluster,
    pub control_plane: NodeSpec,
    pub worker: NodeSpec,
    #[serde(default)]
    pub reserved: ReservedResources,
}

impl HardwareSpec {
    /// Management cluster hardware seeded into new projects
    pub fn management_default() -> Self {
        Self {
            name: MANAGEMENT_HARDWARE_NAME.to_string(),
            cluster: Cluster::NkpManagement,
            control_plane: NodeSpec::new(3, 4, 16, 80),
            worker: NodeSpec::new(4, 8, 32, 80),
            reserved: ReservedResources::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SizingError::invalid("name", "must not be empty"));
        }
        if self.cluster.is_production_tier()
            && self.control_plane.count < MIN_HA_CONTROL_PLANE_NODES
        {
            return Err(SizingError::ControlPlaneQuorum {
                cluster: self.cluster,
                nodes: self.control_plane.count,
            });
        }
        Ok(())
    }
}

/// A stored hardware configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareConfig {
    pub id: u64,
    #[serde(flatten)]
    pub spec: HardwareSpec,
}

impl HardwareConfig {
    pub fn new(id: u64, spec: HardwareSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self { id, spec })
    }
}

/// Annual growth rate registered for one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRatePoint {
    pub year: i32,
    /// Growth percentage, e.g. 20.0 for 20%
    pub rate: f64,
}

impl GrowthRatePoint {
    pub fn new(year: i32, rate: f64) -> Result<Self> {
        non_negative("growth rate", rate)?;
        Ok(Self { year, rate })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SizingError::invalid(field, "must be a number"));
    }
    if value < 0.0 {
        return Err(SizingError::invalid(field, "must not be negative"));
    }
    Ok(())
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
