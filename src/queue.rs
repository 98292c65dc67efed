// src/queue.rs
// =============================================================================
// The hand-off channel between the crawl driver and the verifier workers.
//
// One producer (LinkSender), many consumers (LinkReceiver clones).
// The channel is bounded: when every worker is busy and the buffer is full,
// `push` waits. That couples crawl speed to verification throughput.
//
// Closing is the only termination signal workers ever get. After `close`,
// receivers keep draining what is buffered and then see `None`.
// =============================================================================

use crate::error::{CrawlError, Result};
use crate::link::Link;
use async_channel::{Receiver, Sender};

/// Opens a link queue holding at most `capacity` unconsumed links.
pub fn open(capacity: usize) -> (LinkSender, LinkReceiver) {
    let (tx, rx) = async_channel::bounded(capacity.max(1));
    (LinkSender { tx: Some(tx) }, LinkReceiver { rx })
}

#[derive(Debug)]
pub struct LinkSender {
    tx: Option<Sender<Link>>,
}

impl LinkSender {
    /// Pushes a link, waiting for buffer space if needed.
    pub async fn push(&self, link: Link) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(CrawlError::QueueClosed)?;
        tx.send(link).await.map_err(|_| CrawlError::QueueClosed)
    }

    /// Closes the queue. Returns true only for the call that actually closed it.
    pub fn close(&mut self) -> bool {
        match self.tx.take() {
            Some(tx) => {
                tx.close();
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct LinkReceiver {
    rx: Receiver<Link>,
}

impl LinkReceiver {
    /// Next link, or None once the queue is closed and drained.
    pub async fn next(&self) -> Option<Link> {
        self.rx.recv().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_close_drains_buffered_links_then_ends() {
        let (mut tx, rx) = open(4);
        tx.push(Link::from("http://example.com/1")).await.unwrap();
        tx.push(Link::from("http://example.com/2")).await.unwrap();
        assert!(tx.close());

        assert_eq!(rx.next().await, Some(Link::from("http://example.com/1")));
        assert_eq!(rx.next().await, Some(Link::from("http://example.com/2")));
        assert_eq!(rx.next().await, None);
    }

    #[tokio::test]
    async fn test_close_happens_once() {
        let (mut tx, _rx) = open(1);
        assert!(tx.close());
        assert!(!tx.close());
        assert!(tx.is_closed());
        let err = tx.push(Link::from("http://example.com")).await.unwrap_err();
        assert!(matches!(err, CrawlError::QueueClosed));
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_receivers() {
        let (mut tx, rx) = open(1);
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let rx = rx.clone();
                tokio::spawn(async move { rx.next().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.close();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_push_waits_for_capacity() {
        let (tx, rx) = open(1);
        tx.push(Link::from("http://example.com/1")).await.unwrap();

        let second = tx.push(Link::from("http://example.com/2"));
        let blocked = tokio::time::timeout(Duration::from_millis(50), second).await;
        assert!(blocked.is_err(), "push should wait while the buffer is full");

        assert!(rx.next().await.is_some());
        tx.push(Link::from("http://example.com/3")).await.unwrap();
    }
}
