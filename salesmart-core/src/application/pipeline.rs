// salesmart-core/src/application/pipeline.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info, info_span, warn};

use crate::application::extract::extract_all;
use crate::application::quality::run_quality_checks;
use crate::application::transform::transform_all;
use crate::application::warehouse::WarehouseStore;
use crate::domain::cleaning::CleanMetrics;
use crate::domain::project::ProjectConfig;
use crate::domain::quality::{QualityPolicy, QualityReport};
use crate::error::EtlError;
use crate::infrastructure::fs::write_json_artifact;
use crate::ports::connector::Connector;

pub const QUALITY_REPORT_FILE: &str = "quality_report.json";
pub const RUN_RESULTS_FILE: &str = "run_results.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub quality_report: Option<QualityReport>,
    pub table_info: BTreeMap<String, u64>,
    #[serde(default)]
    pub cleaning: Vec<CleanMetrics>,
    pub errors: Vec<String>,
    pub duration_secs: f64,
}

/// Resolves a configured path against the project directory.
pub fn resolve_path(project_dir: &Path, configured: &str) -> PathBuf {
    let p = Path::new(configured);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        project_dir.join(p)
    }
}

/// Extract, clean, assemble, check, load, index. Fatal errors are returned as
/// `Err`; a blocking quality failure is a normal `RunResult` with `success: false`.
pub async fn run_pipeline(
    project_dir: &Path,
    config: &ProjectConfig,
    connector: &dyn Connector,
) -> Result<RunResult, EtlError> {
    let span = info_span!("pipeline", project = %config.name);
    async {
        println!("🚀 Starting ETL pipeline '{}'...", config.name);
        let start_time = Instant::now();

        let target_dir = resolve_path(project_dir, &config.target_path);
        std::fs::create_dir_all(&target_dir)?;

        println!("📥 [STEP 1/5] Extracting data...");
        let raw_dir = resolve_path(project_dir, &config.raw_path);
        let raw = extract_all(connector, &raw_dir)
            .instrument(info_span!("extract"))
            .await?;

        println!("🔧 [STEP 2/5] Transforming data...");
        let tables = info_span!("transform").in_scope(|| transform_all(&raw))?;
        for m in &tables.metrics {
            println!(
                "   {}: {} -> {} rows ({} missing key, {} duplicates, {} out of range)",
                m.entity, m.input_rows, m.output_rows, m.dropped_missing_key, m.duplicates_removed, m.dropped_out_of_range
            );
        }
        println!("   fact_sales: {} rows", tables.fact_sales.row_count());

        println!("🔎 [STEP 3/5] Running data quality checks...");
        let report = run_quality_checks(&tables, &config.quality);
        println!("   {}/{} checks passed", report.passed, report.total_checks);
        write_json_artifact(target_dir.join(QUALITY_REPORT_FILE), &report)?;

        if !report.all_passed() {
            println!("{}", report);
            if config.quality.policy == QualityPolicy::Block {
                error!(failed = report.failed, "Quality gate blocked the load");
                println!("⛔ Quality policy is 'block': warehouse left untouched.");
                let result = RunResult {
                    success: false,
                    errors: report
                        .checks_failed
                        .iter()
                        .map(|c| format!("{} on {}: {}", c.check, c.table, c.issues.join("; ")))
                        .collect(),
                    quality_report: Some(report),
                    table_info: BTreeMap::new(),
                    cleaning: tables.metrics,
                    duration_secs: start_time.elapsed().as_secs_f64(),
                };
                write_json_artifact(target_dir.join(RUN_RESULTS_FILE), &result)?;
                return Ok(result);
            }
            warn!(failed = report.failed, "Quality checks failed, loading anyway");
        }

        println!("💾 [STEP 4/5] Loading data to warehouse...");
        let store = WarehouseStore::new(connector, info_span!("warehouse"));
        store.load_all(&tables.all()).await?;

        println!("📇 [STEP 5/5] Creating indexes...");
        store.create_indexes().await?;

        let table_info = store.get_table_info().await?;
        let duration = start_time.elapsed().as_secs_f64();
        println!("✨ Done in {:.2}s. Warehouse tables:", duration);
        for (table, count) in &table_info {
            println!("   - {}: {} rows", table, count);
        }
        info!(duration, "ETL pipeline completed successfully");

        let result = RunResult {
            success: true,
            quality_report: Some(report),
            table_info,
            cleaning: tables.metrics,
            errors: Vec::new(),
            duration_secs: duration,
        };
        write_json_artifact(target_dir.join(RUN_RESULTS_FILE), &result)?;
        Ok::<_, EtlError>(result)
    }
    .instrument(span)
    .await
}
