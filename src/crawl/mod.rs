// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Pieces:
// - fetcher: downloads pages and fires crawl events (PageFetcher, CrawlEvents)
// - driver: turns those events into claimed, in-scope links on the queue
// - cooldown: periodic pauses so the site doesn't start rate-limiting us
// =============================================================================

mod cooldown;
mod driver;
mod fetcher;

pub use cooldown::Cooldown;
pub use driver::CrawlDriver;
pub use fetcher::{CrawlEvents, FetchConfig, HtmlFetcher, PageFetcher};
