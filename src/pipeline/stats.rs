//! Statistics for a digest run

use crate::pipeline::aggregate::DayBuckets;

/// Counters collected while running a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestStats {
    /// Message ids returned by the source
    pub messages_listed: usize,

    /// Messages whose detail could not be fetched
    pub fetch_failures: usize,

    /// Messages that were not eligible newsletters
    pub messages_dropped: usize,

    /// Messages enriched into the digest
    pub messages_enriched: usize,

    /// Links attached across all enriched messages
    pub total_links: usize,

    /// Distinct day keys in the digest
    pub days: usize,
}

impl DigestStats {
    /// Fills the digest-derived counters from the finished buckets
    pub fn record_days(&mut self, days: &DayBuckets) {
        self.days = days.len();
        self.messages_enriched = days.values().map(Vec::len).sum();
        self.total_links = days
            .values()
            .flat_map(|records| records.iter())
            .map(|r| r.links.len())
            .sum();
    }

    /// Share of listed messages that made it into the digest, in percent
    pub fn newsletter_rate(&self) -> f64 {
        if self.messages_listed == 0 {
            0.0
        } else {
            (self.messages_enriched as f64 / self.messages_listed as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DigestStats) {
    println!("=== Digest Statistics ===\n");

    println!("Messages:");
    println!("  Listed: {}", stats.messages_listed);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Not newsletters: {}", stats.messages_dropped);
    println!("  Enriched: {}", stats.messages_enriched);
    println!();

    println!("Digest:");
    println!("  Days: {}", stats.days);
    println!("  Links: {}", stats.total_links);
    println!();

    println!(
        "Newsletter Rate: {:.1}% ({} / {} messages)",
        stats.newsletter_rate(),
        stats.messages_enriched,
        stats.messages_listed
    );
}
