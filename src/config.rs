// src/config.rs
// =============================================================================
// Folds command-line flags and prompt answers into one immutable config.
//
// This is where startup errors surface: a seed URL that doesn't parse, or
// one with no host, stops the run before anything is fetched.
// =============================================================================

use crate::cli::Cli;
use crate::crawl::{Cooldown, FetchConfig};
use crate::error::Result;
use crate::link::CrawlScope;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub scope: CrawlScope,
    pub workers: usize,
    pub timeout: Duration,
    pub max_depth: usize,
    pub cooldown_every: usize,
    pub json: bool,
}

impl CrawlConfig {
    /// Builds the config from parsed flags plus the resolved seed and external choice.
    pub fn from_cli(cli: &Cli, seed_url: &str, include_external: bool) -> Result<Self> {
        Ok(Self {
            scope: CrawlScope::new(seed_url, include_external)?,
            workers: usize::from(cli.workers),
            timeout: Duration::from_secs(cli.timeout),
            max_depth: usize::from(cli.max_depth),
            cooldown_every: cli.cooldown_every,
            json: cli.json,
        })
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            allowed_domains: self.scope.allowed_domains(),
            max_depth: self.max_depth,
            timeout: self.timeout,
            ..FetchConfig::default()
        }
    }

    pub fn cooldown(&self) -> Cooldown {
        match self.cooldown_every {
            0 => Cooldown::disabled(),
            every => Cooldown::new(every),
        }
    }
}
