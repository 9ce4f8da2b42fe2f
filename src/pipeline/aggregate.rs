//! Day bucketing of enriched messages

use crate::message::EnrichedMessage;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::collections::BTreeMap;

/// Day key format, e.g. `2024-01-05`
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Enriched messages grouped by day key, each day in processing order
pub type DayBuckets = BTreeMap<String, Vec<EnrichedMessage>>;

/// Groups enriched messages by calendar day in a fixed time zone
#[derive(Debug, Clone, Copy)]
pub struct DayAggregator {
    offset: FixedOffset,
}

impl DayAggregator {
    /// Creates an aggregator for a fixed UTC offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Creates an aggregator from an offset in minutes east of UTC
    ///
    /// Returns `None` when the offset is out of range (beyond ±24h).
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    /// An aggregator keyed on UTC dates
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// The zone day keys are computed in
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Computes the day key for a send timestamp
    pub fn day_key(&self, date_sent: &DateTime<Utc>) -> String {
        date_sent
            .with_timezone(&self.offset)
            .format(DAY_KEY_FORMAT)
            .to_string()
    }

    /// Buckets records by day, preserving their relative order within each day
    pub fn aggregate<I>(&self, records: I) -> DayBuckets
    where
        I: IntoIterator<Item = EnrichedMessage>,
    {
        let mut days = DayBuckets::new();
        for record in records {
            days.entry(self.day_key(&record.date_sent))
                .or_default()
                .push(record);
        }
        days
    }
}

impl Default for DayAggregator {
    fn default() -> Self {
        Self::utc()
    }
}
