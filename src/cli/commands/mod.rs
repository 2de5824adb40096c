//! CLI command implementations.

pub mod annotate;
pub mod ping;
pub mod query;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Use the positional text, or read all of stdin when it is absent
pub(crate) async fn read_text(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("Failed to read text from stdin")?;
    Ok(buf)
}
