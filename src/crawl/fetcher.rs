// src/crawl/fetcher.rs
// =============================================================================
// The page-fetch layer: downloads pages and reports what it finds.
//
// The crawl engine never touches HTML itself. It only sees events:
// - on_request_start: a page is about to be requested (headers can be set)
// - on_anchor_found:  an <a href> was found on a page (raw href + page URL)
// - on_crawl_finished: no pages are left to fetch
//
// `HtmlFetcher` is the real implementation:
// 1. Start with the seed URL in a queue
// 2. Fetch the page HTML (skipping domains outside the allow-list);
//    a seed page that fails to load is an error, deeper failures are skipped
// 3. Report every anchor, in document order
// 4. If we haven't reached max depth, queue the anchors' pages too
// 5. Repeat until the queue is empty, then report the crawl finished
//
// robots.txt is never consulted.
//
// Rust concepts:
// - Traits as seams: tests replace HtmlFetcher with a scripted fake
// - HashSet: To track visited pages (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Callbacks fired by a page fetcher while it crawls.
#[async_trait]
pub trait CrawlEvents: Send {
    /// Called right before a page request; injected headers are sent with it.
    fn on_request_start(&mut self, url: &str, headers: &mut HeaderMap);

    /// Called for every anchor href found on a page. May wait (backpressure).
    async fn on_anchor_found(&mut self, href: &str, page_url: &str);

    /// Called once when there are no more pages to fetch.
    fn on_crawl_finished(&mut self);
}

/// Something that can crawl from a seed URL and fire `CrawlEvents`.
///
/// Implementations must call `on_crawl_finished` exactly once, even when
/// pages fail to load.
#[async_trait]
pub trait PageFetcher: Send {
    async fn visit(&mut self, seed: &str, events: &mut dyn CrawlEvents) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Hosts pages may be fetched from; None means any host
    pub allowed_domains: Option<Vec<String>>,
    /// 1 = only the seed page, 2 = seed + pages it links to, ...
    pub max_depth: usize,
    pub timeout: Duration,
    /// Pause between page fetches
    pub page_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            allowed_domains: None,
            max_depth: 1,
            timeout: Duration::from_secs(10),
            page_delay: Duration::from_millis(100),
        }
    }
}

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: String,
    depth: usize, // How many levels deep from the seed
}

pub struct HtmlFetcher {
    client: Client,
    config: FetchConfig,
}

impl HtmlFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }
        match &self.config.allowed_domains {
            None => true,
            Some(domains) => parsed
                .host_str()
                .is_some_and(|host| domains.iter().any(|d| d == host)),
        }
    }

    async fn crawl(&mut self, seed: &str, events: &mut dyn CrawlEvents) -> Result<()> {
        if !self.is_allowed(seed) {
            return Err(anyhow!("seed URL is outside the allowed domains: {}", seed));
        }

        let mut queue = VecDeque::new();
        queue.push_back(CrawlItem {
            url: seed.to_string(),
            depth: 1,
        });
        let mut visited = HashSet::new();

        while let Some(item) = queue.pop_front() {
            if !visited.insert(item.url.clone()) {
                continue;
            }
            if !self.is_allowed(&item.url) {
                tracing::debug!(url = %item.url, "skipping page outside allowed domains");
                continue;
            }

            let mut headers = HeaderMap::new();
            events.on_request_start(&item.url, &mut headers);

            let html = match fetch_page(&self.client, &item.url, headers).await {
                Ok(html) => html,
                // Without the seed page there is nothing to crawl
                Err(e) if item.depth == 1 => {
                    return Err(e.context(format!("failed to fetch seed page {}", item.url)));
                }
                Err(e) => {
                    tracing::warn!(url = %item.url, error = %e, "failed to fetch page");
                    continue;
                }
            };

            let anchors = extract_anchors(&html);
            tracing::debug!(url = %item.url, anchors = anchors.len(), "page scraped");

            for href in &anchors {
                events.on_anchor_found(href, &item.url).await;
            }

            if item.depth < self.config.max_depth {
                for next in follow_targets(&item.url, &anchors) {
                    if !visited.contains(&next) {
                        queue.push_back(CrawlItem {
                            url: next,
                            depth: item.depth + 1,
                        });
                    }
                }
            }

            // Polite crawling: small delay between page requests
            tokio::time::sleep(self.config.page_delay).await;
        }

        Ok(())
    }
}

#[async_trait]
impl PageFetcher for HtmlFetcher {
    async fn visit(&mut self, seed: &str, events: &mut dyn CrawlEvents) -> Result<()> {
        let result = self.crawl(seed, events).await;
        events.on_crawl_finished();
        result
    }
}

// Fetches a web page and returns its HTML content
async fn fetch_page(client: &Client, url: &str, headers: HeaderMap) -> Result<String> {
    let response = client.get(url).headers(headers).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP {}", response.status()));
    }

    Ok(response.text().await?)
}

// Raw href values of every <a href> on the page, in document order.
// The parsed document is not Send, so it must not live across an .await.
fn extract_anchors(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// Pages worth fetching next: anchors properly resolved against the current page
fn follow_targets(page_url: &str, anchors: &[String]) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    anchors
        .iter()
        .filter(|href| !href.starts_with('#'))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .collect()
}
