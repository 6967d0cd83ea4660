//! Link-Sonar main entry point
//!
//! This is the command-line interface for the Link-Sonar link checker.

use anyhow::Context;
use clap::Parser;
use link_sonar::config::{load_config_with_hash, Config};
use link_sonar::crawler::{HttpRenderer, PageRenderer};
use link_sonar::job::{Job, JobOrchestrator, JobRequest, JobStatus, PartialJobOptions};
use link_sonar::output::{print_job_summary, write_json_report, write_markdown_report};
use link_sonar::storage::{open_job_store, JobStore};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Link-Sonar: outbound link discovery and health checking
///
/// Link-Sonar discovers the links a website points at, using its sitemaps
/// when available and scraping its pages otherwise, then checks every link
/// and reports which ones are alive, dead, or erroring.
#[derive(Parser, Debug)]
#[command(name = "link-sonar")]
#[command(version)]
#[command(about = "Finds dead outbound links on a website", long_about = None)]
struct Cli {
    /// Website to check (http or https)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only check the root page, do not visit internal pages
    #[arg(long)]
    no_follow: bool,

    /// Maximum number of internal pages visited after the root
    #[arg(long, value_name = "N")]
    max_internal_pages: Option<u32>,

    /// Maximum number of links checked
    #[arg(long, value_name = "N")]
    max_links: Option<u32>,

    /// Number of links checked concurrently
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Write the job as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Write a markdown report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Persist the job in this SQLite database
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Render pages in headless Chromium (requires the `browser` feature)
    #[arg(long)]
    browser: bool,

    /// Only list dead and erroring links in the summary
    #[arg(long)]
    dead_only: bool,

    /// Exit with status 2 when any dead link is found
    #[arg(long)]
    fail_on_dead: bool,
}

impl Cli {
    /// Per-job overrides given on the command line
    fn option_overrides(&self) -> PartialJobOptions {
        PartialJobOptions {
            follow_internal_links: self.no_follow.then_some(false),
            max_internal_pages: self.max_internal_pages.map(i64::from),
            max_links_to_check: self.max_links.map(i64::from),
            link_check_concurrency: self.concurrency.map(i64::from),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    let database_path = cli
        .database
        .clone()
        .or_else(|| config.output.database_path.as_ref().map(PathBuf::from));
    if let Some(path) = &database_path {
        tracing::info!("Storing jobs in {}", path.display());
    }
    let store = open_job_store(database_path.as_deref()).context("Failed to open job store")?;

    let request = JobRequest::new(cli.url.clone()).with_options(cli.option_overrides());

    let job = if cli.browser {
        run_in_browser(&config, store, request).await?
    } else {
        let renderer = Arc::new(HttpRenderer::new(&config.fetcher)?);
        run_job(&config, renderer, store, request).await?
    };

    if !cli.quiet {
        print_job_summary(&job, cli.dead_only);
    }

    let report_path = cli
        .report
        .clone()
        .or_else(|| config.output.report_path.as_ref().map(PathBuf::from));
    if let Some(path) = &report_path {
        write_markdown_report(&job, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Markdown report written to {}", path.display());
    }

    if let Some(path) = &cli.json {
        write_json_report(&job, path)
            .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
        tracing::info!("JSON report written to {}", path.display());
    }

    Ok(exit_code(&job, cli.fail_on_dead))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_sonar=info,warn"),
            1 => EnvFilter::new("link_sonar=debug,info"),
            2 => EnvFilter::new("link_sonar=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file when given, the defaults otherwise
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Submits one job and waits for it to finish
async fn run_job(
    config: &Config,
    renderer: Arc<dyn PageRenderer>,
    store: Arc<dyn JobStore>,
    request: JobRequest,
) -> anyhow::Result<Job> {
    let orchestrator = Arc::new(JobOrchestrator::new(config, renderer, store)?);
    let submitted = orchestrator.submit(request)?;
    let job = submitted.handle.await.context("Job task panicked")?;
    Ok(job)
}

#[cfg(feature = "browser")]
async fn run_in_browser(
    config: &Config,
    store: Arc<dyn JobStore>,
    request: JobRequest,
) -> anyhow::Result<Job> {
    use link_sonar::crawler::ChromeRenderer;

    let chrome = Arc::new(ChromeRenderer::launch(&config.fetcher).await?);
    let job = run_job(config, chrome.clone(), store, request).await;

    match Arc::try_unwrap(chrome) {
        Ok(chrome) => chrome.shutdown().await,
        Err(_) => tracing::warn!("Browser still in use, leaving it to exit with the process"),
    }

    job
}

#[cfg(not(feature = "browser"))]
async fn run_in_browser(
    _config: &Config,
    _store: Arc<dyn JobStore>,
    _request: JobRequest,
) -> anyhow::Result<Job> {
    anyhow::bail!("--browser requires link-sonar to be built with the `browser` feature")
}

fn exit_code(job: &Job, fail_on_dead: bool) -> ExitCode {
    match job.status {
        JobStatus::Completed => {
            let dead = job.result.as_ref().map(|r| r.dead).unwrap_or(0);
            if fail_on_dead && dead > 0 {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        _ => ExitCode::FAILURE,
    }
}
