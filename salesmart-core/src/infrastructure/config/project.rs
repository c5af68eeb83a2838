// salesmart-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::domain::quality::{QualityPolicy, QualityRule};
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["salesmart_project.yaml", "salesmart.yaml"];

pub const ENV_WAREHOUSE_PATH: &str = "SALESMART_WAREHOUSE_PATH";
pub const ENV_RAW_PATH: &str = "SALESMART_RAW_PATH";
pub const ENV_QUALITY_POLICY: &str = "SALESMART_QUALITY_POLICY";

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config = load_layers(project_dir)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
    Ok(config)
}

/// Main file plus satellites, without the environment layer.
fn load_layers(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");
    let mut config: ProjectConfig = load_fragment(&config_path)?;

    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    CONFIG_CANDIDATES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.exists())
        .ok_or_else(|| {
            InfrastructureError::ConfigNotFound(format!(
                "No configuration file found in {:?}. Checked: {:?}",
                root, CONFIG_CANDIDATES
            ))
        })
}

fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| InfrastructureError::ConfigError(format!("Failed to parse {:?}: {}", path, e)))
}

fn load_satellite_configs(config: &mut ProjectConfig, config_dir: &Path) -> Result<(), InfrastructureError> {
    let qual_path = config_dir.join("quality.yml");
    if qual_path.exists() {
        #[derive(Deserialize)]
        struct QualityWrapper {
            policy: Option<QualityPolicy>,
            max_null_pct: Option<f64>,
            min_rows: Option<usize>,
            checks: Option<Vec<QualityRule>>,
        }

        let wrapper: QualityWrapper = load_fragment(&qual_path)?;
        if let Some(policy) = wrapper.policy {
            config.quality.policy = policy;
        }
        if let Some(pct) = wrapper.max_null_pct {
            config.quality.max_null_pct = pct;
        }
        if let Some(min_rows) = wrapper.min_rows {
            config.quality.min_rows = min_rows;
        }
        if let Some(checks) = wrapper.checks {
            config.quality.checks = checks;
        }
        info!(checks = config.quality.checks.len(), "Quality rules loaded");
    }
    Ok(())
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_WAREHOUSE_PATH) {
        info!(old = ?config.warehouse_path, new = ?val, "Overriding warehouse path via ENV");
        config.warehouse_path = val;
    }
    if let Some(val) = lookup(ENV_RAW_PATH) {
        info!(old = ?config.raw_path, new = ?val, "Overriding raw path via ENV");
        config.raw_path = val;
    }
    if let Some(val) = lookup(ENV_QUALITY_POLICY) {
        config.quality.policy = val.parse().map_err(InfrastructureError::ConfigError)?;
        info!(policy = ?config.quality.policy, "Overriding quality policy via ENV");
    }
    Ok(())
}
