// salesmart-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path};

use crate::error::EtlError;
use crate::infrastructure::config::project::load_project_config;

/// Removes the configured artifact paths (warehouse file, reports). Returns what was removed.
pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, EtlError> {
    tracing::info!("Initializing cleanup sequence...");

    let config = load_project_config(project_dir)?;
    let targets = if config.clean_targets.is_empty() {
        vec!["target".to_string()]
    } else {
        config.clean_targets
    };

    let mut removed = Vec::new();
    for target_rel_path in targets {
        let rel = Path::new(&target_rel_path);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(EtlError::UnsafePath(target_rel_path));
        }

        let full_path = project_dir.join(rel);
        if full_path.is_dir() {
            fs::remove_dir_all(&full_path)?;
        } else if full_path.exists() {
            fs::remove_file(&full_path)?;
        } else {
            continue;
        }
        println!("   🗑️  Artifact removed: {}", target_rel_path);
        removed.push(target_rel_path);
    }

    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_clean_removes_targets() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("salesmart.yaml"),
            "name: shop\nversion: '1.0'\nclean-targets: [target, logs]\n",
        )?;
        fs::create_dir_all(dir.path().join("target"))?;
        fs::write(dir.path().join("target/warehouse.duckdb"), "x")?;

        let removed = clean_project(dir.path())?;
        assert_eq!(removed, vec!["target".to_string()]);
        assert!(!dir.path().join("target").exists());
        assert!(dir.path().join("salesmart.yaml").exists());
        Ok(())
    }

    #[test]
    fn test_clean_refuses_traversal() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("salesmart.yaml"),
            "name: shop\nversion: '1.0'\nclean-targets: ['../elsewhere']\n",
        )?;
        let err = clean_project(dir.path()).unwrap_err();
        assert!(matches!(err, EtlError::UnsafePath(_)));
        Ok(())
    }
}
