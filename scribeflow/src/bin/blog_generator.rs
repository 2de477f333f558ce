//! Generates a technical blog series: plans a roadmap, then writes each post.

use anyhow::{Context, Result};
use clap::Parser;
use scribeflow::blog::{BlogManager, BlogRequest, DEFAULT_GOAL, DEFAULT_TOPIC, LOG_FILENAME};
use scribeflow::config::AppConfig;
use scribeflow::observability::{init_logging, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;

/// Technical blog series generator
#[derive(Parser, Debug, Clone)]
#[command(name = "blog-generator")]
#[command(about = "Generate technical blog posts")]
#[command(version)]
struct Args {
    /// The main topic of the blog series
    #[arg(long, value_name = "TEXT")]
    topic: Option<String>,

    /// The goal of the blog series
    #[arg(long, value_name = "TEXT")]
    goal: Option<String>,

    /// Skip the planning phase and use an existing roadmap file
    #[arg(long)]
    skip_planning: bool,

    /// Path to a roadmap markdown file
    #[arg(long, value_name = "PATH")]
    roadmap_file: Option<PathBuf>,

    /// Model name (overrides SCRIBEFLOW_MODEL)
    #[arg(long, value_name = "NAME")]
    model_name: Option<String>,

    /// Output directory (overrides SCRIBEFLOW_OUTPUT_DIR)
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
        .with_output_dir(args.output_dir);

    init_logging(
        &LogConfig::new()
            .with_verbose(args.verbose)
            .with_file(config.output_dir.join(LOG_FILENAME)),
    )?;

    if args.skip_planning && args.roadmap_file.is_none() {
        tracing::warn!("--skip-planning without --roadmap-file: no posts will be written");
    }

    let provider = Arc::new(config.provider().context("failed to create model provider")?);
    let mut manager = BlogManager::new(provider, config.output());
    if let Some(search) = config.search_backend().context("failed to create search backend")? {
        manager = manager.with_search(search, config.search_results);
    }

    let mut request = BlogRequest::new(
        args.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        args.goal.unwrap_or_else(|| DEFAULT_GOAL.to_string()),
    )
    .skip_planning(args.skip_planning);
    if let Some(path) = args.roadmap_file {
        request = request.with_roadmap_file(path);
    }

    let result = manager
        .run(&request)
        .await
        .context("blog generation failed")?;

    println!(
        "Generated {} of {} posts in {} ({} degraded)",
        result.posts.len(),
        result.roadmap.len(),
        config.output_dir.display(),
        result.degraded_posts(),
    );

    Ok(())
}
