// salesmart-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Writes `content` through a temporary file in the target directory, then
/// renames it over `path`. Readers see either the old file or the new one.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file.persist(path).map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}

/// Pretty-printed JSON artifact, written atomically.
pub fn write_json_artifact<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), InfrastructureError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| InfrastructureError::ConfigError(format!("cannot serialize artifact: {}", e)))?;
    atomic_write(path, json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("run_results.json");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        assert_eq!(fs::read_to_string(file_path)?, "Updated");
        Ok(())
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("target/nested/report.json");
        atomic_write(&file_path, "{}")?;
        assert!(file_path.exists());
        Ok(())
    }

    #[test]
    fn test_write_json_artifact() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("info.json");
        write_json_artifact(&file_path, &serde_json::json!({ "orders": 3 }))?;
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(file_path)?)?;
        assert_eq!(parsed["orders"], 3);
        Ok(())
    }
}
