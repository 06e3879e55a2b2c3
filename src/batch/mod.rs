//! Batch orchestration of the enrichment passes.
//!
//! This module provides:
//! - `BatchOrchestrator`, running IP resolution, redirect checks, crawling and
//!   third-party IP resolution over a list of entries
//! - `Pacer` / `PacingPolicy`, the fixed inter-item delay
//! - `PassReport` and `PassEvent` for callers and observers
//!
//! Passes are strictly sequential: an item starts only after the previous item
//! and its delay have completed.

mod events;
mod orchestrator;
mod pacing;

// Re-export public API
pub use events::{PassEvent, PassKind, PassReport};
pub use orchestrator::BatchOrchestrator;
pub use pacing::{Pacer, PacingPolicy};
