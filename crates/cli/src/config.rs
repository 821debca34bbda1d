//! Configuration management for the CLI
//!
//! Settings are layered: built-in defaults, then a TOML file
//! (`~/.config/nkp-sizer/config.toml` unless `--config` is given), then
//! `NKPS_*` environment variables.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sizer_lib::{
    engine, Cluster, DEFAULT_HORIZON_YEARS, DEFAULT_PODS_PER_VCPU, MAX_HORIZON_YEARS,
    MAX_PODS_PER_VCPU,
};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SizerConfig {
    /// Directory holding the project file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Years projected past the current one
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,

    /// Assumed pod density per vCPU
    #[serde(default = "default_pods_per_vcpu")]
    pub pods_per_vcpu: u64,

    /// Cluster used when a command is given none
    #[serde(default = "default_cluster")]
    pub default_cluster: String,

    /// Pin the current year instead of reading the clock
    #[serde(default)]
    pub current_year: Option<i32>,
}

fn default_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .map(|dir| dir.join("nkp-sizer"))
        .unwrap_or_else(|| PathBuf::from(".nkp-sizer"))
}

fn default_horizon_years() -> u32 {
    DEFAULT_HORIZON_YEARS
}

fn default_pods_per_vcpu() -> u64 {
    DEFAULT_PODS_PER_VCPU
}

fn default_cluster() -> String {
    Cluster::Production.name().to_string()
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            horizon_years: default_horizon_years(),
            pods_per_vcpu: default_pods_per_vcpu(),
            default_cluster: default_cluster(),
            current_year: None,
        }
    }
}

impl SizerConfig {
    /// Load configuration from the config file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => match Self::config_path() {
                Some(path) => builder.add_source(config::File::from(path).required(false)),
                None => builder,
            },
        };

        let config = builder
            .add_source(config::Environment::with_prefix("NKPS").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the sizing engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PODS_PER_VCPU).contains(&self.pods_per_vcpu) {
            bail!(
                "pods_per_vcpu must be between 1 and {}, got {}",
                MAX_PODS_PER_VCPU,
                self.pods_per_vcpu
            );
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            bail!(
                "horizon_years must be at most {}, got {}",
                MAX_HORIZON_YEARS,
                self.horizon_years
            );
        }
        self.default_cluster()?;
        Ok(())
    }

    /// Year projections start from
    pub fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(engine::current_year)
    }

    pub fn default_cluster(&self) -> Result<Cluster> {
        self.default_cluster
            .parse()
            .with_context(|| format!("Invalid default_cluster '{}'", self.default_cluster))
    }

    /// Get the default configuration file path
    fn config_path() -> Option<PathBuf> {
        let home = dirs_next::home_dir()?;
        Some(home.join(".config").join("nkp-sizer").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "data_dir = \"/tmp/sizer\"\nhorizon_years = 8\npods_per_vcpu = 20\ndefault_cluster = \"DR\"\ncurrent_year = 2030\n",
        )
        .unwrap();

        let config = SizerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/sizer"));
        assert_eq!(config.horizon_years, 8);
        assert_eq!(config.pods_per_vcpu, 20);
        assert_eq!(config.default_cluster().unwrap(), Cluster::Dr);
        assert_eq!(config.current_year(), 2030);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");
        assert!(SizerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SizerConfig::default();
        assert_eq!(config.horizon_years, DEFAULT_HORIZON_YEARS);
        assert_eq!(config.pods_per_vcpu, DEFAULT_PODS_PER_VCPU);
        assert_eq!(config.default_cluster().unwrap(), Cluster::Production);
    }

    #[test]
    fn test_out_of_range_settings_rejected() {
        let temp_dir = TempDir::new().unwrap();

        let path = temp_dir.path().join("dense.toml");
        fs::write(&path, "pods_per_vcpu = 0\n").unwrap();
        let err = SizerConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("pods_per_vcpu"));

        let path = temp_dir.path().join("huge.toml");
        fs::write(&path, "pods_per_vcpu = 1844674407370955161\n").unwrap();
        assert!(SizerConfig::load(Some(&path)).is_err());

        let path = temp_dir.path().join("horizon.toml");
        fs::write(&path, "horizon_years = 3000000000\n").unwrap();
        let err = SizerConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("horizon_years"));

        let path = temp_dir.path().join("cluster.toml");
        fs::write(&path, "default_cluster = \"Mars\"\n").unwrap();
        assert!(SizerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let config = SizerConfig {
            pods_per_vcpu: MAX_PODS_PER_VCPU,
            horizon_years: MAX_HORIZON_YEARS,
            ..SizerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
