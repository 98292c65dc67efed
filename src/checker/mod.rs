// src/checker/mod.rs
// =============================================================================
// This module contains all link verification logic.
//
// Submodules:
// - http: probes a single link and classifies the outcome
// - pool: runs a fixed number of probing workers off the shared link queue
// =============================================================================

mod http;
mod pool;

pub use http::{HttpProbe, LinkProbe};
pub use pool::VerifierPool;
