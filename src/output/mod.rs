//! Output module for writing digests
//!
//! This module handles:
//! - Writing the day-bucketed digest as JSON (the API payload shape)
//! - Rendering a human-readable markdown digest

mod json;
mod markdown;

pub use json::{format_json_digest, write_json_digest};
pub use markdown::{format_markdown_digest, generate_markdown_digest};

use crate::config::OutputConfig;
use crate::pipeline::DayBuckets;
use chrono::FixedOffset;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes both the JSON and the markdown digest to their configured paths
pub fn write_digest(
    days: &DayBuckets,
    offset: FixedOffset,
    config: &OutputConfig,
) -> crate::Result<()> {
    write_json_digest(days, Path::new(&config.digest_path))?;
    generate_markdown_digest(days, offset, Path::new(&config.summary_path))?;

    tracing::info!(
        "Digest written to {} and {}",
        config.digest_path,
        config.summary_path
    );
    Ok(())
}
