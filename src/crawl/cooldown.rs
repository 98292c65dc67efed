// src/crawl/cooldown.rs
// =============================================================================
// Periodic cooldown pauses during crawling.
//
// Every `every` claimed links the driver stops and waits through a few fixed
// stages before pushing the next link. Sites that rate-limit (429) or throw
// CAPTCHAs at fast clients are less likely to do so with these gaps.
//
// Default: every 250 links, three stages of 6 seconds (18s total).
// =============================================================================

use crate::output;
use std::time::Duration;

pub const DEFAULT_EVERY: usize = 250;

#[derive(Debug, Clone)]
struct CooldownStage {
    message: &'static str,
    delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Cooldown {
    every: usize,
    stages: Vec<CooldownStage>,
    counter: usize,
}

impl Cooldown {
    /// `every == 0` never pauses.
    pub fn new(every: usize) -> Self {
        let stage_delay = Duration::from_secs(6);
        Self {
            every,
            stages: vec![
                CooldownStage {
                    message: "Just a second, evading CAPTCHAs and 429s...",
                    delay: stage_delay,
                },
                CooldownStage {
                    message: "Sneaking past the CAPTCHAs...",
                    delay: stage_delay,
                },
                CooldownStage {
                    message: "Almost there...",
                    delay: stage_delay,
                },
            ],
            counter: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn every(&self) -> usize {
        self.every
    }

    #[cfg(test)]
    fn counter(&self) -> usize {
        self.counter
    }

    pub fn total_delay(&self) -> Duration {
        self.stages.iter().map(|s| s.delay).sum()
    }

    /// Counts one accepted link and pauses if the threshold was just reached.
    ///
    /// Returns true if a pause ran. The counter is back at zero afterwards.
    pub async fn tick(&mut self) -> bool {
        if self.every == 0 {
            return false;
        }

        self.counter += 1;
        if self.counter < self.every {
            return false;
        }

        tracing::info!(after = self.every, pause = ?self.total_delay(), "cooldown pause");
        for stage in &self.stages {
            output::progress(format_args!("{}", stage.message));
            tokio::time::sleep(stage.delay).await;
        }
        self.counter = 0;
        true
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_EVERY)
    }
}
