// salesmart/src/commands/run.rs
//
// USE CASE: Run the ETL pipeline.

use std::path::PathBuf;

use anyhow::Context;
use salesmart_core::application::pipeline::resolve_path;
use salesmart_core::application::run_pipeline;
use salesmart_core::infrastructure::adapters::duckdb::DuckDBConnector;
use salesmart_core::infrastructure::config::load_project_config;

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);

    let db_path = resolve_path(&project_dir, &config.warehouse_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let db_path = db_path.to_string_lossy().to_string();
    println!("   Warehouse: {} 🦆", db_path);
    let connector = DuckDBConnector::new(&db_path)
        .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?;

    match run_pipeline(&project_dir, &config, &connector).await {
        Ok(run_res) => {
            if run_res.success {
                println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
            } else {
                eprintln!(
                    "\n❌ FAILURE. {} quality checks blocked the load:",
                    run_res.errors.len()
                );
                for err in &run_res.errors {
                    eprintln!("   - {}", err);
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
