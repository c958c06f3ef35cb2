#![forbid(unsafe_code)]

mod output;
mod run;
mod tables;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use charnet_core::load_config;
use clap::Parser;
use run::TaskSlice;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "charnet: weighted character networks for a corpus of novels",
    long_about = None
)]
struct Cli {
    /// Configuration file (TOML). A missing file means all defaults.
    #[arg(short, long, default_value = "charnet.toml")]
    config: PathBuf,

    /// 1-based task number of a partitioned run.
    #[arg(long, default_value_t = 1)]
    task: usize,

    /// Number of tasks the corpus is split into.
    #[arg(long, default_value_t = 1)]
    total: usize,

    /// Also compute network statistics.
    #[arg(long)]
    stats: bool,

    /// Also detect communities and tally their demographics.
    #[arg(long)]
    communities: bool,

    /// Print one JSON summary per processed book on stdout.
    #[arg(long)]
    json: bool,

    /// Log at debug level unless CHARNET_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CHARNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "charnet=debug,info"
        } else {
            "charnet=info,warn"
        })
    });

    let format = env::var("CHARNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.analysis.network_stats |= cli.stats;
    config.analysis.communities |= cli.communities;
    debug!(?config, "configuration");

    let slice = TaskSlice {
        task: cli.task,
        total: cli.total,
    };
    let report = run::run(&config, slice, cli.json)?;
    if report.skipped > 0 {
        info!(skipped = report.skipped, "some books were skipped");
    }
    Ok(())
}
