//! Plans a multi-agent system for a task and saves the plan as markdown.

use anyhow::{Context, Result};
use clap::Parser;
use scribeflow::config::AppConfig;
use scribeflow::observability::{init_logging, LogConfig};
use scribeflow::planner::{save_plan, AgentsPlanner, PlannerSearch, DEFAULT_TASK};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Multi-agent system planner
///
/// Runs four model stages (task analysis, agent design, workflow design and
/// final description) over a shared blackboard and writes the resulting plan
/// to `agent_system_plan.md`.
#[derive(Parser, Debug, Clone)]
#[command(name = "agents-planner")]
#[command(about = "Plan a multi-agent system for a task")]
#[command(version)]
struct Args {
    /// Task description to plan for
    #[arg(long, value_name = "TEXT")]
    task: Option<String>,

    /// Model name (overrides SCRIBEFLOW_MODEL)
    #[arg(long, value_name = "NAME")]
    model_name: Option<String>,

    /// Directory for agent_system_plan.md (overrides SCRIBEFLOW_PLANNER_OUTPUT_DIR)
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::from_env()?
        .with_model(args.model_name)
        .with_planner_output_dir(args.output_dir);

    init_logging(&LogConfig::new().with_verbose(args.verbose))?;

    let provider = Arc::new(config.provider().context("failed to create model provider")?);
    let search = config
        .search_backend()
        .context("failed to create search backend")?
        .map(|search| PlannerSearch {
            search,
            max_results: config.search_results,
        });

    let planner = AgentsPlanner::new(provider, search)?;
    let task = args.task.unwrap_or_else(|| DEFAULT_TASK.to_string());

    println!("Planning agent system for task: {task}");
    let outcome = planner.plan_agent_system(&task).await;

    println!("\nField status:\n{}", outcome.status_report());
    println!("\n--- Final Agent System Description ---");
    println!("{}", outcome.description());
    println!("--- End Final Agent System Description ---");

    let message = save_plan(&config.planner_output(), outcome.description());
    println!("\n{message}");
    info!(partial = outcome.is_partial(), "Planner finished");

    Ok(())
}
