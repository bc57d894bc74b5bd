//! `resplan` -- assign planned tasks to developers or testers.
//!
//! Reads a task table (JSON records) and a plan file (TOML), runs one
//! assignment pass, and writes the updated table as JSON records.
//!
//! # Usage
//!
//! ```bash
//! # Write the planned table to stdout
//! cargo run --bin resplan -- --plan plan.toml --tasks tasks.json
//!
//! # Write to a file, audit the result, report per-resource load
//! cargo run --bin resplan -- -p plan.toml -t tasks.json -o planned.json --audit --loads
//!
//! # Verbose logging via environment variable
//! RUST_LOG=u_resplan=debug cargo run --bin resplan -- -p plan.toml -t tasks.json
//! ```

use std::path::Path;

use clap::Parser;
use u_resplan::config::{CliArgs, PlanConfig};
use u_resplan::error::PlanError;
use u_resplan::records;
use u_resplan::scheduler::ResourceLoad;
use u_resplan::validation::audit_assignments;

fn main() {
    let cli = CliArgs::parse();

    // Initialize tracing before loading so config resolution is visible.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "planning failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &CliArgs) -> Result<(), PlanError> {
    let config = PlanConfig::load(cli)?;
    tracing::info!(plan = %cli.plan.display(), "plan loaded");

    let json = read_to_string(&cli.tasks)?;
    let tasks = records::from_json_str(&json)?;
    tracing::info!(rows = tasks.row_count(), columns = tasks.columns().len(), "tasks loaded");

    let outcome = config.engine().assign(&tasks)?;

    if cli.loads {
        for load in ResourceLoad::calculate(&outcome.table, &config.columns, &config.pool) {
            tracing::info!(
                resource = %load.resource,
                tasks = load.task_count,
                hours = load.total_hours,
                utilization = ?load.utilization,
                "resource load"
            );
        }
    }

    if cli.audit {
        let violations =
            audit_assignments(&outcome.table, &config.columns, &config.pool, &config.calendar);
        for v in &violations {
            tracing::warn!(
                kind = ?v.violation_type,
                entity = %v.entity_id,
                rows = ?v.rows,
                severity = v.severity,
                "{}",
                v.message
            );
        }
        tracing::info!(violations = violations.len(), "audit complete");
    }

    let output = records::to_json_string(&outcome.table)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, output).map_err(|e| PlanError::WriteFile {
                path: path.clone(),
                source: e,
            })?;
            tracing::info!(path = %path.display(), "planned table written");
        }
        None => println!("{output}"),
    }
    Ok(())
}

fn read_to_string(path: &Path) -> Result<String, PlanError> {
    std::fs::read_to_string(path).map_err(|e| PlanError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}
