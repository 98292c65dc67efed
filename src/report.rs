// src/report.rs
// =============================================================================
// The final report, assembled only after every verifier has exited.
//
// Two renderings:
// - text: the summary block printed at the end of a run
// - JSON: the same data via serde_json (--json)
// =============================================================================

use crate::state::DeadLink;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Distinct in-scope links handed to the verifiers
    pub total_checked: usize,
    pub dead_count: usize,
    pub dead_links: Vec<DeadLink>,
    pub elapsed_ms: u64,
}

impl Report {
    pub fn new(total_checked: usize, dead_links: Vec<DeadLink>, elapsed: Duration) -> Self {
        Self {
            total_checked,
            dead_count: dead_links.len(),
            dead_links,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn has_dead_links(&self) -> bool {
        self.dead_count > 0
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Checked {} links in total. Found {} dead links:",
            self.total_checked, self.dead_count
        );
        for dead in &self.dead_links {
            let _ = writeln!(out, "{}; status [{}]; error [{}]", dead.link, dead.status, dead.error);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Completed in: {}ms", self.elapsed_ms);
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;

    fn sample() -> Report {
        Report::new(
            3,
            vec![
                DeadLink {
                    link: Link::from("http://example.com/missing"),
                    status: 404,
                    error: "None".to_string(),
                },
                DeadLink {
                    link: Link::from("http://example.com/down"),
                    status: 0,
                    error: "connection refused".to_string(),
                },
            ],
            Duration::from_millis(1234),
        )
    }

    #[test]
    fn test_text_report_lists_every_dead_link() {
        let text = sample().render_text();
        assert_eq!(
            text,
            "Checked 3 links in total. Found 2 dead links:\n\
             http://example.com/missing; status [404]; error [None]\n\
             http://example.com/down; status [0]; error [connection refused]\n\
             \n\
             Completed in: 1234ms\n"
        );
    }

    #[test]
    fn test_dead_count_matches_entries() {
        let report = sample();
        assert_eq!(report.dead_count, report.dead_links.len());
        assert!(report.has_dead_links());
        assert!(!Report::new(5, Vec::new(), Duration::ZERO).has_dead_links());
    }

    #[test]
    fn test_json_report_shape() {
        let json: serde_json::Value = serde_json::from_str(&sample().render_json().unwrap()).unwrap();
        assert_eq!(json["total_checked"], 3);
        assert_eq!(json["dead_count"], 2);
        assert_eq!(json["dead_links"][0]["link"], "http://example.com/missing");
        assert_eq!(json["dead_links"][1]["status"], 0);
        assert_eq!(json["elapsed_ms"], 1234);
    }
}
