//! Markdown digest generation
//!
//! Renders the day buckets as a readable document: one section per day, one
//! entry per newsletter with its summary and links.

use crate::output::OutputResult;
use crate::pipeline::DayBuckets;
use chrono::FixedOffset;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown digest to a file
pub fn generate_markdown_digest(
    days: &DayBuckets,
    offset: FixedOffset,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_digest(days, offset);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Escapes the characters that would break a markdown link label
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Formats the digest as markdown
///
/// Days are listed newest first. Send times are shown in `offset`, the same
/// zone the day keys were computed in.
pub fn format_markdown_digest(days: &DayBuckets, offset: FixedOffset) -> String {
    let mut md = String::new();

    md.push_str("# Newsletter Digest\n\n");

    if days.is_empty() {
        md.push_str("No newsletters in this batch.\n");
        return md;
    }

    let total: usize = days.values().map(Vec::len).sum();
    md.push_str(&format!(
        "- **Newsletters**: {}\n- **Days**: {}\n\n",
        total,
        days.len()
    ));

    for (day, records) in days.iter().rev() {
        md.push_str(&format!("## {}\n\n", day));

        for record in records {
            md.push_str(&format!("### {}\n\n", record.subject));
            md.push_str(&format!(
                "*From {} at {}*\n\n",
                record.from,
                record.date_sent
                    .with_timezone(&offset)
                    .format("%H:%M UTC%:z")
            ));
            md.push_str(&record.summary);
            md.push_str("\n\n");

            if !record.links.is_empty() {
                md.push_str("**Links**\n\n");
                for link in &record.links {
                    md.push_str(&format!(
                        "- [{}]({})\n",
                        escape_link_text(&link.display_text),
                        link.url
                    ));
                }
                md.push('\n');
            }
        }
    }

    md
}
