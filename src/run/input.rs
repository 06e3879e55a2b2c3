//! Input reading.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Reads the whole input as text; `-` reads stdin.
///
/// Invalid UTF-8 is replaced rather than rejected: URLs are ASCII, and the
/// surrounding prose does not matter.
pub async fn read_input(path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    if path.as_os_str() == "-" {
        log::info!("Reading text from stdin");
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("Failed to read stdin")?;
    } else {
        bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
