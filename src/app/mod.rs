//! Run-level helpers used by the enrichment driver.
//!
//! This module provides progress logging from pass events, Ctrl-C handling,
//! and statistics printing.

pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use logging::spawn_progress_logger;
pub use shutdown::cancel_on_ctrl_c;
pub use statistics::{print_failure_statistics, print_simple_summary};
