// salesmart/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "target/warehouse.duckdb";

#[derive(Parser)]
#[command(name = "salesmart")]
#[command(about = "Batch ETL for e-commerce extracts into a DuckDB sales warehouse", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the ETL pipeline (Extract -> Clean -> Fact -> Quality -> Load)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Removes build artifacts (warehouse file, reports)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// ⚡ Executes a read-only SQL query against the warehouse
    Query {
        query: String,
        #[arg(long, env = "SALESMART_WAREHOUSE_PATH", default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },

    /// 📊 Lists warehouse tables with their row counts
    Info {
        #[arg(long, env = "SALESMART_WAREHOUSE_PATH", default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },

    /// 🔍 Inspects a warehouse table (schema + sample rows)
    Inspect {
        /// Path to the DuckDB database file
        #[arg(long, env = "SALESMART_WAREHOUSE_PATH", default_value = DEFAULT_DB_PATH)]
        db_path: String,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}
