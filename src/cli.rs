// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Everything is optional. Run with no URL and the tool asks for one
// interactively, the same as typing it at a prompt.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate parsing code for our types
// =============================================================================

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "link-reaper",
    version,
    about = "Crawl a website and report dead links",
    long_about = "link-reaper crawls a website from a seed URL, checks every link it finds \
                  and reports the ones that don't answer with HTTP 200.\n\n\
                  Sites behind bot protection (Cloudflare and friends) or rendered with \
                  JavaScript won't crawl properly."
)]
pub struct Cli {
    /// Seed URL to start crawling from (prompted for when omitted)
    pub url: Option<String>,

    /// Also verify links to other domains
    ///
    /// Only used together with a URL argument; the interactive mode asks instead.
    #[arg(long)]
    pub external: bool,

    /// Number of parallel link verifiers
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub workers: u16,

    /// Timeout per request in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum crawl depth (1 = just the seed page)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_depth: u16,

    /// Pause after this many links to avoid rate limiting (0 = never)
    #[arg(long, default_value_t = 250)]
    pub cooldown_every: usize,

    /// Output the final report in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// More diagnostics on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
