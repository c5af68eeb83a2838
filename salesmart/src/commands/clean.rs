// salesmart/src/commands/clean.rs
//
// USE CASE: Remove build artifacts.

use std::path::PathBuf;

use anyhow::Context;
use salesmart_core::application::clean_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("🧹 Cleaning project artifacts...");
    let removed = clean_project(&project_dir)
        .with_context(|| format!("Failed to clean project at {:?}", project_dir))?;
    if removed.is_empty() {
        println!("   Nothing to clean.");
    } else {
        println!("✨ Removed {} artifact(s).", removed.len());
    }
    Ok(())
}
