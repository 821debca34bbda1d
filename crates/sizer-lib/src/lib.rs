//! Sizing library for NKP cluster capacity planning
//!
//! This crate provides the core functionality for:
//! - Workload and hardware records with validated construction
//! - Supply/demand aggregation and utilization scoring
//! - Multi-year growth projection
//! - Project persistence behind a repository interface
//! - Structured logging and Prometheus exposition of sizing figures

pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod store;

pub use engine::{
    compute_demand_totals, compute_license_cores, compute_supply_totals, compute_utilization,
    count_workloads, project_growth, remove_growth_rate, upsert_growth_rate, CapacityTier,
    DemandTotals, GrowthProjection, GrowthTable, ResourceUsage, SizingEngine, SizingSummary,
    SupplyTotals, Utilization, UtilizationScorer, DEFAULT_HORIZON_YEARS, DEFAULT_PODS_PER_VCPU,
    MAX_HORIZON_YEARS, MAX_PODS_PER_VCPU,
};
pub use error::{Result, SizingError};
pub use models::*;
pub use observability::{SizingMetrics, StructuredLogger};
pub use store::{JsonFileStore, MemoryStore, SizingSource, SizingStore};
