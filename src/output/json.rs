use crate::output::OutputResult;
use crate::pipeline::DayBuckets;
use std::path::Path;

/// Serializes the digest as pretty-printed JSON
///
/// The shape is `{ "YYYY-MM-DD": [ { from, subject, dateSent, summary, links: [ { text, url } ] } ] }`.
pub fn format_json_digest(days: &DayBuckets) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(days)?)
}

/// Writes the JSON digest to a file
pub fn write_json_digest(days: &DayBuckets, output_path: &Path) -> OutputResult<()> {
    let json = format_json_digest(days)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
