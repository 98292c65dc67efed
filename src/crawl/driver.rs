// src/crawl/driver.rs
// =============================================================================
// The crawl driver: reacts to page-fetch events and feeds the link queue.
//
// For every anchor found:
// 1. Resolve it against the seed and drop it if it's out of scope
// 2. Claim it in the visited set (skip if someone already did)
// 3. Maybe run a cooldown pause
// 4. Push it onto the queue (waits if the workers are behind), then count it
//
// When the fetcher reports the crawl is finished, the queue is closed. That
// is the signal for the workers to drain and exit.
// =============================================================================

use super::cooldown::Cooldown;
use super::fetcher::CrawlEvents;
use crate::link::CrawlScope;
use crate::output;
use crate::queue::LinkSender;
use crate::state::VisitedSet;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER, USER_AGENT};
use std::sync::Arc;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

pub struct CrawlDriver {
    scope: CrawlScope,
    visited: Arc<VisitedSet>,
    queue: LinkSender,
    cooldown: Cooldown,
    discovered: usize,
}

impl CrawlDriver {
    pub fn new(
        scope: CrawlScope,
        visited: Arc<VisitedSet>,
        queue: LinkSender,
        cooldown: Cooldown,
    ) -> Self {
        Self {
            scope,
            visited,
            queue,
            cooldown,
            discovered: 0,
        }
    }

    /// Number of distinct in-scope links the queue accepted so far.
    ///
    /// A link claimed after the queue closed is not counted.
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Closes the link queue if the fetcher hasn't done so through
    /// `on_crawl_finished`. Returns true if this call closed it.
    pub fn close_queue(&mut self) -> bool {
        let closed = self.queue.close();
        if closed {
            tracing::debug!(discovered = self.discovered, "link queue closed");
        }
        closed
    }

    pub fn is_queue_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

// Sets a browser-like request identity. Cheap bot filters let these through;
// JavaScript-rendered sites and real bot mitigation still won't.
fn apply_browser_identity(url: &str, headers: &mut HeaderMap) {
    if let Ok(referer) = HeaderValue::from_str(url) {
        headers.insert(REFERER, referer);
    }
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
}

#[async_trait]
impl CrawlEvents for CrawlDriver {
    fn on_request_start(&mut self, url: &str, headers: &mut HeaderMap) {
        output::progress(format_args!("Visiting: {}", url));
        apply_browser_identity(url, headers);
    }

    async fn on_anchor_found(&mut self, href: &str, page_url: &str) {
        let Some(link) = self.scope.admit(href) else {
            return;
        };
        if !self.visited.claim(&link) {
            return;
        }

        output::progress(format_args!("Found link: {}, checking status...", link));
        tracing::trace!(link = %link, page = page_url, "link claimed");

        self.cooldown.tick().await;

        match self.queue.push(link).await {
            Ok(()) => self.discovered += 1,
            Err(e) => {
                tracing::warn!(error = %e, page = page_url, "link found after crawl finished, not verified")
            }
        }
    }

    fn on_crawl_finished(&mut self) {
        output::progress(format_args!("Finishing up..."));
        self.close_queue();
    }
}
