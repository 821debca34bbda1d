//! Error types for the sizing library

use std::path::PathBuf;

use crate::models::Cluster;

pub type Result<T, E = SizingError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SizingError {
    /// A quantity or rate failed validation before reaching the engine
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Production-tier clusters need a control-plane quorum
    #[error("{cluster} clusters require minimum 3 control plane nodes, got {nodes}")]
    ControlPlaneQuorum { cluster: Cluster, nodes: u32 },

    #[error("unknown cluster '{0}'")]
    UnknownCluster(String),

    #[error("unknown workload type '{0}'")]
    UnknownWorkloadType(String),

    #[error("unknown license '{0}'")]
    UnknownLicense(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("failed to access project file {path:?}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project file {path:?} is not valid")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SizingError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
