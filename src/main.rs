//! RPA-Scout main entry point
//!
//! This is the command-line interface for the RPA opportunity scanner.

use anyhow::Context;
use clap::Parser;
use rpa_scout::classifier::{CancelFlag, OpenAiClient};
use rpa_scout::config::{read_config_or_default, validate, Config};
use rpa_scout::output::{print_summary, writers_for};
use rpa_scout::{Pipeline, ScanRequest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RPA-Scout: finds automatable business processes on a website
///
/// RPA-Scout crawls a site's internal links, previews each page and asks a
/// language model which pages describe workflows worth automating with RPA.
#[derive(Parser, Debug)]
#[command(name = "rpa-scout")]
#[command(version)]
#[command(about = "Find RPA opportunities on a website", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL", required_unless_present = "list_models")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Classification instructions sent ahead of the page previews
    #[arg(long, conflicts_with = "prompt_file")]
    prompt: Option<String>,

    /// Read the classification instructions from a file
    #[arg(long, value_name = "FILE")]
    prompt_file: Option<PathBuf>,

    /// Model identifier, e.g. gpt-4o
    #[arg(short, long)]
    model: Option<String>,

    /// Link hops to follow from the seed URL
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// URLs per model call
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Where to write the markdown report
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Also export the results as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and show the effective settings without scanning
    #[arg(long, conflicts_with = "list_models")]
    dry_run: bool,

    /// List the chat models available to the configured API key and exit
    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // API keys may live in a local .env file
    dotenvy::dotenv().ok();

    let (mut config, config_hash) = match read_config_or_default(cli.config.as_deref()) {
        Ok((cfg, hash)) => {
            match &cli.config {
                Some(path) => tracing::info!(
                    "Configuration loaded from {} (hash: {})",
                    path.display(),
                    hash
                ),
                None => tracing::info!("No configuration file given, using defaults"),
            }
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli)?;
    validate(&config).context("Invalid configuration")?;

    if cli.list_models {
        handle_list_models(&config).await
    } else if cli.dry_run {
        handle_dry_run(&config, cli.url.as_deref().unwrap_or_default())
    } else {
        let url = cli.url.clone().unwrap_or_default();
        handle_scan(config, config_hash, url).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rpa_scout=info,warn"),
            1 => EnvFilter::new("rpa_scout=debug,info"),
            2 => EnvFilter::new("rpa_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.prompt_file {
        let prompt = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file {}", path.display()))?;
        config.classifier.prompt = Some(prompt);
    } else if let Some(prompt) = &cli.prompt {
        config.classifier.prompt = Some(prompt.clone());
    }

    if let Some(model) = &cli.model {
        config.classifier.model = model.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(size) = cli.batch_size {
        config.classifier.batch_size = size;
    }
    if let Some(path) = &cli.report {
        config.output.report_path = path.display().to_string();
    }
    if let Some(path) = &cli.json {
        config.output.json_path = Some(path.display().to_string());
    }

    Ok(())
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, url: &str) -> anyhow::Result<()> {
    println!("=== RPA-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", url);
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nPreview:");
    println!("  Max chars: {}", config.preview.max_chars);
    println!("  Timeout: {}s", config.preview.timeout_secs);

    println!("\nClassifier:");
    println!("  Model: {}", config.classifier.model);
    println!("  Batch size: {}", config.classifier.batch_size);
    println!("  Temperature: {}", config.classifier.temperature);
    println!("  Max tokens: {}", config.classifier.max_tokens);
    println!("  API base URL: {}", config.classifier.api_base_url);
    println!(
        "  Prompt: {}",
        if config.classifier.prompt.is_some() {
            "custom"
        } else {
            "default"
        }
    );

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);
    if let Some(json) = &config.output.json_path {
        println!("  JSON: {}", json);
    }

    rpa_scout::url::parse_seed(url).context("Invalid seed URL")?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would scan {} to depth {}", url, config.crawler.max_depth);

    Ok(())
}

/// Handles the --list-models mode
async fn handle_list_models(config: &Config) -> anyhow::Result<()> {
    let client = OpenAiClient::from_config(&config.classifier)?;
    let models = client
        .list_models()
        .await
        .context("Failed to list models")?;

    for model in models {
        println!("{}", model);
    }

    Ok(())
}

/// Handles the main scan operation
async fn handle_scan(config: Config, config_hash: String, url: String) -> anyhow::Result<()> {
    let client = OpenAiClient::from_config(&config.classifier)?;
    let request = ScanRequest::from_config(url, &config);
    let writers = writers_for(&config.output);
    let pipeline = Pipeline::new(config, config_hash, client)?;

    // Ctrl-C asks the scan to stop at the next checkpoint
    let cancel = CancelFlag::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if handle.cancel() {
                tracing::error!("Second interrupt received, exiting immediately");
                std::process::exit(130);
            }
            tracing::warn!(
                "Interrupt received, stopping after the current batch (press Ctrl-C again to exit now)"
            );
        }
    });

    let report = match pipeline.run(&request, &cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            return Err(e.into());
        }
    };

    for writer in &writers {
        writer
            .write_report(&report)
            .with_context(|| format!("Failed to write {}", writer.path().display()))?;
    }

    print_summary(&report);

    Ok(())
}
