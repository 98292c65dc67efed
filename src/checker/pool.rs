// src/checker/pool.rs
// =============================================================================
// A fixed-size pool of verifier workers sharing one link queue.
//
// Each worker loops:
//   1. take the next link from the queue (waits if empty)
//   2. probe it
//   3. record a DeadLink if it isn't a 200, then print a progress line
// until the queue is closed and empty, then exits.
//
// A failing link never stops a worker. The only way out is queue close.
// =============================================================================

use super::http::{classify, LinkProbe, VerificationOutcome};
use crate::error::{CrawlError, Result};
use crate::output;
use crate::queue::LinkReceiver;
use crate::state::DeadLinkCollector;
use futures::future::join_all;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct VerifierPool {
    workers: Vec<JoinHandle<usize>>,
}

impl VerifierPool {
    /// Starts `size` workers reading from `queue`.
    pub fn spawn(
        size: usize,
        queue: LinkReceiver,
        probe: Arc<dyn LinkProbe>,
        dead_links: Arc<DeadLinkCollector>,
    ) -> Self {
        let workers = (0..size.max(1))
            .map(|id| {
                let queue = queue.clone();
                let probe = Arc::clone(&probe);
                let dead_links = Arc::clone(&dead_links);
                tokio::spawn(run_worker(id, queue, probe, dead_links))
            })
            .collect();

        Self { workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Waits for every worker to exit and returns how many links all of them checked.
    ///
    /// Only returns after the queue has been closed; the caller closes it first.
    pub async fn join(self) -> Result<usize> {
        let mut checked = 0;
        for result in join_all(self.workers).await {
            checked += result.map_err(|e| CrawlError::WorkerPanicked(e.to_string()))?;
        }
        Ok(checked)
    }
}

async fn run_worker(
    id: usize,
    queue: LinkReceiver,
    probe: Arc<dyn LinkProbe>,
    dead_links: Arc<DeadLinkCollector>,
) -> usize {
    tracing::debug!(worker = id, "verifier started");
    let mut checked = 0;

    while let Some(link) = queue.next().await {
        let result = probe.probe(&link).await;
        settle(id, classify(link, result), &dead_links, &mut io::stdout().lock());
        checked += 1;
    }

    tracing::debug!(worker = id, checked, "verifier exiting, queue drained");
    checked
}

// Records the outcome first; the progress line can't lose it
fn settle(
    id: usize,
    outcome: VerificationOutcome,
    dead_links: &DeadLinkCollector,
    out: &mut impl Write,
) {
    let line = outcome.progress_line();

    if let Some(dead) = outcome.into_dead_link() {
        if let Err(e) = dead_links.record(dead) {
            tracing::error!(worker = id, error = %e, "dead link dropped");
        }
    }

    output::write_line(out, format_args!("{}", line));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;
    use crate::output::tests::ClosedPipe;
    use crate::queue;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers from a fixed table and counts calls per link.
    struct TableProbe {
        answers: HashMap<String, u16>,
        calls: Mutex<HashMap<String, usize>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TableProbe {
        fn new(answers: &[(&str, u16)]) -> Self {
            Self {
                answers: answers.iter().map(|(l, s)| (l.to_string(), *s)).collect(),
                calls: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LinkProbe for TableProbe {
        async fn probe(&self, link: &Link) -> anyhow::Result<u16> {
            *self.calls.lock().unwrap().entry(link.to_string()).or_default() += 1;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.answers
                .get(link.as_str())
                .copied()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_pool_records_only_failures() {
        let probe = Arc::new(TableProbe::new(&[
            ("http://example.com/ok", 200),
            ("http://example.com/missing", 404),
        ]));
        let dead_links = Arc::new(DeadLinkCollector::new());
        let (mut tx, rx) = queue::open(2);
        let pool = VerifierPool::spawn(3, rx, probe.clone(), Arc::clone(&dead_links));

        for link in [
            "http://example.com/ok",
            "http://example.com/missing",
            "http://example.com/refused",
        ] {
            tx.push(Link::from(link)).await.unwrap();
        }
        tx.close();

        assert_eq!(pool.join().await.unwrap(), 3);

        let mut entries = dead_links.freeze();
        entries.sort_by(|a, b| a.status.cmp(&b.status));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link.as_str(), "http://example.com/refused");
        assert_eq!(entries[0].status, 0);
        assert_eq!(entries[0].error, "connection refused");
        assert_eq!(entries[1].status, 404);
        assert_eq!(entries[1].error, "None");
    }

    #[tokio::test]
    async fn test_pool_runs_workers_in_parallel() {
        let probe = Arc::new(TableProbe::new(&[]));
        let (mut tx, rx) = queue::open(8);
        let pool = VerifierPool::spawn(4, rx, probe.clone(), Arc::new(DeadLinkCollector::new()));
        assert_eq!(pool.size(), 4);

        for i in 0..8 {
            tx.push(Link::from(format!("http://example.com/{}", i).as_str()))
                .await
                .unwrap();
        }
        tx.close();
        pool.join().await.unwrap();

        assert!(probe.peak.load(Ordering::SeqCst) > 1);
        assert!(probe.peak.load(Ordering::SeqCst) <= 4);
        let calls = probe.calls.lock().unwrap();
        assert_eq!(calls.len(), 8);
        assert!(calls.values().all(|n| *n == 1));
    }

    #[test]
    fn test_dead_link_kept_when_stdout_is_closed() {
        let dead_links = DeadLinkCollector::new();
        let outcome = classify(Link::from("http://example.com/missing"), Ok(404));

        settle(0, outcome, &dead_links, &mut ClosedPipe);

        let entries = dead_links.freeze();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, 404);
        assert_eq!(entries[0].error, "None");
    }

    #[test]
    fn test_settle_writes_progress_line() {
        let dead_links = DeadLinkCollector::new();
        let mut out = Vec::new();
        settle(0, classify(Link::from("http://example.com/ok"), Ok(200)), &dead_links, &mut out);

        assert_eq!(String::from_utf8(out).unwrap(), "OK - http://example.com/ok\n");
        assert!(dead_links.freeze().is_empty());
    }

    #[tokio::test]
    async fn test_pool_exits_when_queue_closed_empty() {
        let (mut tx, rx) = queue::open(1);
        let pool = VerifierPool::spawn(
            5,
            rx,
            Arc::new(TableProbe::new(&[])),
            Arc::new(DeadLinkCollector::new()),
        );
        tx.close();
        assert_eq!(pool.join().await.unwrap(), 0);
    }
}
