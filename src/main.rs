//! Page Harvester main entry point
//!
//! This is the command-line interface: it starts crawls, stops them on
//! Ctrl-C, prints progress and statistics, and exports the results.

use anyhow::{bail, Context};
use clap::Parser;
use page_harvester::config::{load_config, validate, Config};
use page_harvester::crawler::{CrawlEngine, CrawlEvent};
use page_harvester::export::{export_all, ExportFormat, ExportResult};
use page_harvester::logging::setup_logging;
use page_harvester::store::print_statistics;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;

/// Page Harvester: a polite structured-data crawler
///
/// Crawls each seed URL breadth-first within its own site, extracts
/// metadata, tables, text, links, lists, forms and JSON-LD from every page,
/// and exports the results as JSON, CSV, XLSX and/or SQLite.
#[derive(Parser, Debug)]
#[command(name = "page-harvester")]
#[command(version)]
#[command(about = "A polite structured-data crawler", long_about = None)]
struct Cli {
    /// Seed URLs to crawl (overrides seeds from the config file)
    #[arg(value_name = "URL")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum pages per seed (1-500)
    #[arg(short = 'n', long)]
    max_pages: Option<u32>,

    /// Delay between requests in seconds (0.1-10.0)
    #[arg(short, long)]
    delay: Option<f64>,

    /// Request timeout in seconds (1-120)
    #[arg(long)]
    timeout: Option<u64>,

    /// Export format; may be repeated (default: all formats)
    #[arg(short, long = "format", value_enum)]
    formats: Vec<ExportFormat>,

    /// Directory for exported files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Honour robots.txt on each seed's host
    #[arg(long)]
    respect_robots: bool,

    /// Re-crawl the seeds every MINUTES minutes until interrupted (1-1440)
    #[arg(long, value_name = "MINUTES")]
    loop_interval: Option<u64>,

    /// In loop mode, export the accumulated results after every cycle
    #[arg(long)]
    auto_export: bool,

    /// Also append log lines to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    setup_logging(cli.verbose, cli.quiet, config.output.log_file.as_deref())
        .context("Failed to open log file")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Loads the config file (if any), then applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if !cli.seeds.is_empty() {
        config.seeds = cli.seeds.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_seconds = timeout;
    }
    if cli.respect_robots {
        config.crawler.respect_robots = true;
    }
    if !cli.formats.is_empty() {
        config.output.formats = cli.formats.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.export_dir = dir.clone();
    }
    if let Some(minutes) = cli.loop_interval {
        config.schedule.loop_interval_minutes = Some(minutes);
    }
    if cli.auto_export {
        config.schedule.auto_export = true;
    }
    if let Some(log_file) = &cli.log_file {
        config.output.log_file = Some(log_file.clone());
    }

    validate(&config).context("Invalid configuration")?;

    if config.seeds.is_empty() {
        bail!("No seed URLs given; pass one on the command line or set `seeds` in the config file");
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Page Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per seed: {}", config.crawler.max_pages);
    println!("  Delay: {}s", config.crawler.delay_seconds);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Export directory: {}", config.output.export_dir.display());
    let formats: Vec<String> = config.output.formats.iter().map(|f| f.to_string()).collect();
    println!("  Formats: {}", formats.join(", "));
    if let Some(log_file) = &config.output.log_file {
        println!("  Log file: {}", log_file.display());
    }

    match config.schedule.loop_interval_minutes {
        Some(minutes) => {
            println!("\nLoop mode: every {} minute(s)", minutes);
            println!("  Auto-export: {}", config.schedule.auto_export);
        }
        None => println!("\nLoop mode: off"),
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    let mut engine = CrawlEngine::new(&config).context("Failed to build HTTP client")?;
    let events = engine.subscribe();
    let progress = tokio::spawn(report_progress(events, quiet));

    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.stop();
        }
    });

    tracing::info!("Crawling {} seed(s)", config.seeds.len());
    let results = match config.schedule.interval() {
        Some(interval) => {
            let auto_export = config.schedule.auto_export;
            engine
                .crawl_loop(&config.seeds, interval, |cycle, results| {
                    if auto_export {
                        tracing::info!("Auto-exporting after cycle #{}", cycle);
                        let outcomes = export_all(
                            results.pages(),
                            &config.output.formats,
                            &config.output.export_dir,
                        );
                        report_exports(&outcomes, quiet);
                    }
                })
                .await
        }
        None => engine.crawl_all(&config.seeds).await,
    };

    // Closing the channel lets the progress task drain and exit
    drop(engine);
    let _ = progress.await;

    if !quiet {
        println!();
        print_statistics(&results.statistics());
    }

    let outcomes = export_all(
        results.pages(),
        &config.output.formats,
        &config.output.export_dir,
    );

    if !outcomes.is_empty() && report_exports(&outcomes, quiet) == outcomes.len() {
        bail!("All exports failed");
    }

    Ok(())
}

/// Prints one line per export outcome and returns the number that failed
fn report_exports(outcomes: &[(ExportFormat, ExportResult<PathBuf>)], quiet: bool) -> usize {
    let mut failed = 0;
    for (format, outcome) in outcomes {
        match outcome {
            Ok(path) => {
                if !quiet {
                    println!("✓ {} exported to {}", format, path.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("✗ {} export failed: {}", format, e);
            }
        }
    }
    failed
}

/// Prints one line per progress event until the engine goes away
async fn report_progress(mut events: UnboundedReceiver<CrawlEvent>, quiet: bool) {
    while let Some(event) = events.recv().await {
        if quiet {
            continue;
        }

        match event {
            CrawlEvent::Started { seed, max_pages } => {
                println!("Crawling {} (up to {} pages)", seed, max_pages);
            }
            CrawlEvent::PageProcessed(p) => {
                println!(
                    "[{:5.1}%] {}/{} | ok {} | failed {} | tables {} | links {} | {:.1}s | {}",
                    p.percentage(),
                    p.pages_done,
                    p.max_pages,
                    p.succeeded,
                    p.failed,
                    p.tables_found,
                    p.links_found,
                    p.elapsed.as_secs_f64(),
                    p.url
                );
            }
            CrawlEvent::Finished {
                seed,
                state,
                pages,
                elapsed,
            } => {
                println!(
                    "Finished {}: {} after {} pages in {:.1}s",
                    seed,
                    state,
                    pages,
                    elapsed.as_secs_f64()
                );
            }
        }
    }
}
