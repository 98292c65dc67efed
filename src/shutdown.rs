// src/shutdown.rs
// =============================================================================
// Runs one crawl from start to report, and owns the shutdown ordering.
//
// Phases:
//   Idle -> Crawling -> Draining -> Done
//
// - Crawling: the fetcher walks pages, the driver streams links to the queue
// - Draining: the queue is closed, workers finish whatever is still queued
// - Done:     every worker has exited, the dead-link list is frozen and read
//
// The report is never read before the last worker exits, so no in-flight
// verification can go missing from it.
// =============================================================================

use crate::checker::{LinkProbe, VerifierPool};
use crate::crawl::{Cooldown, CrawlDriver, PageFetcher};
use crate::link::CrawlScope;
use crate::queue;
use crate::report::Report;
use crate::state::{DeadLinkCollector, VisitedSet};
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Crawling,
    Draining,
    Done,
}

pub struct CrawlRun {
    scope: CrawlScope,
    workers: usize,
    cooldown: Cooldown,
    phase: Phase,
}

impl CrawlRun {
    pub fn new(scope: CrawlScope, workers: usize, cooldown: Cooldown) -> Self {
        Self {
            scope,
            workers,
            cooldown,
            phase: Phase::Idle,
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phases only move forward");
        tracing::info!(from = ?self.phase, to = ?next, "crawl phase");
        self.phase = next;
    }

    /// Crawls from the seed, verifies every claimed link, and returns the report.
    ///
    /// A fetcher error is fatal: the pool is still drained so no task is left
    /// behind, but no report is produced.
    pub async fn run(
        mut self,
        fetcher: &mut dyn PageFetcher,
        probe: Arc<dyn LinkProbe>,
        started: Instant,
    ) -> Result<Report> {
        let visited = Arc::new(VisitedSet::new());
        let dead_links = Arc::new(DeadLinkCollector::new());

        // One slot per worker: the driver can run at most one batch ahead
        let (sender, receiver) = queue::open(self.workers);
        let pool = VerifierPool::spawn(self.workers, receiver, probe, Arc::clone(&dead_links));
        tracing::debug!(
            workers = pool.size(),
            cooldown_every = self.cooldown.every(),
            "verifier pool started"
        );

        let seed = self.scope.seed_url().to_string();
        let mut driver = CrawlDriver::new(
            self.scope.clone(),
            Arc::clone(&visited),
            sender,
            self.cooldown.clone(),
        );

        self.enter(Phase::Crawling);
        let crawled = fetcher.visit(&seed, &mut driver).await;

        if !driver.is_queue_closed() {
            tracing::warn!("fetcher returned without finishing the crawl, closing queue");
            driver.close_queue();
        }
        self.enter(Phase::Draining);

        let verified = pool.join().await?;
        let dead = dead_links.freeze();
        self.enter(Phase::Done);
        tracing::debug!(
            verified,
            visited = visited.len(),
            dead = dead.len(),
            "all verifiers exited"
        );

        crawled?;
        Ok(Report::new(driver.discovered(), dead, started.elapsed()))
    }
}
