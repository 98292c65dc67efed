// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (or prompt for them)
// 2. Build the crawl config, the HTTP probe and the page fetcher
// 3. Run the crawl until every found link has been verified
// 4. Print the report
// 5. Exit with proper code (0 = no dead links, 1 = dead links, 2 = error)
// =============================================================================

mod checker; // src/checker/ - link verification and the worker pool
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - resolved run configuration
mod crawl; // src/crawl/ - page fetching and the crawl driver
mod error; // src/error.rs - typed engine errors
mod link; // src/link.rs - link normalization and scope
mod output; // src/output.rs - progress lines on stdout
mod prompt; // src/prompt.rs - interactive questions
mod queue; // src/queue.rs - the link hand-off channel
mod report; // src/report.rs - final summary
mod shutdown; // src/shutdown.rs - crawl phases and drain ordering
mod state; // src/state.rs - visited set and dead-link collector

use anyhow::Result;
use checker::HttpProbe;
use clap::Parser;
use cli::Cli;
use config::CrawlConfig;
use crawl::HtmlFetcher;
use shutdown::CrawlRun;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr; RUST_LOG overrides the -v level
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("link_reaper={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// Returns:
//   Ok(0) = no dead links
//   Ok(1) = dead links found
//   Err   = fatal startup or crawl error
async fn run() -> Result<i32> {
    let started = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let interactive = cli.url.is_none();
    let (seed_url, include_external) = match &cli.url {
        Some(url) => (url.clone(), cli.external),
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            let url = prompt::ask_for_url(&mut input, &mut output)?;
            let external = prompt::ask_check_external(&mut input, &mut output)?;
            (url, external)
        }
    };

    let config = CrawlConfig::from_cli(&cli, &seed_url, include_external)?;
    tracing::info!(
        seed = config.scope.seed_url(),
        host = config.scope.host(),
        external = config.scope.include_external(),
        workers = config.workers,
        "starting crawl"
    );

    let probe = Arc::new(HttpProbe::new(config.timeout)?);
    let mut fetcher = HtmlFetcher::new(config.fetch_config())?;

    let report = CrawlRun::new(config.scope.clone(), config.workers, config.cooldown())
        .run(&mut fetcher, probe, started)
        .await?;

    if config.json {
        println!("{}", report.render_json()?);
    } else {
        println!();
        print!("{}", report.render_text());
    }

    if interactive {
        prompt::wait_for_enter(&mut io::stdin().lock(), &mut io::stdout())?;
    }

    Ok(if report.has_dead_links() { 1 } else { 0 })
}
