use crate::errors::BucketError;
use crate::models::{
    ClusterKey, ClusterKeys, ClusterPoint, EventCountBucket, EventCountBucketInfo, RawRow,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, Utc};
use std::collections::HashMap;
use tracing::warn;

const LABEL_FORMAT: &str = "%m/%d %H:%M";
const NAME_WORDS: usize = 3;

/// Raw rows grouped by their exact `timestamp_bucket` string, in order of
/// first appearance.
#[derive(Debug, Default)]
pub struct PartitionMap {
    groups: Vec<(String, Vec<RawRow>)>,
    index: HashMap<String, usize>,
}

impl PartitionMap {
    pub fn get(&self, timestamp_bucket: &str) -> Option<&[RawRow]> {
        self.index
            .get(timestamp_bucket)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RawRow])> {
        self.groups
            .iter()
            .map(|(timestamp, rows)| (timestamp.as_str(), rows.as_slice()))
    }

    fn push(&mut self, row: RawRow) {
        match self.index.get(&row.timestamp_bucket) {
            Some(&slot) => self.groups[slot].1.push(row),
            None => {
                self.index
                    .insert(row.timestamp_bucket.clone(), self.groups.len());
                self.groups.push((row.timestamp_bucket.clone(), vec![row]));
            }
        }
    }
}

impl IntoIterator for PartitionMap {
    type Item = (String, Vec<RawRow>);
    type IntoIter = std::vec::IntoIter<(String, Vec<RawRow>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

pub fn partition(rows: impl IntoIterator<Item = RawRow>) -> PartitionMap {
    let mut partitions = PartitionMap::default();
    for row in rows {
        partitions.push(row);
    }
    partitions
}

/// `Cluster: ` followed by the first three words of the name joined with
/// `, `, or by the id when the cluster has no name.
pub fn derive_key(cluster_id: &str, cluster_name: Option<&str>) -> ClusterKey {
    match cluster_name.filter(|name| !name.is_empty()) {
        Some(name) => {
            let words: Vec<&str> = name.split_whitespace().take(NAME_WORDS).collect();
            ClusterKey::with_label(&words.join(", "))
        }
        None => ClusterKey::with_label(cluster_id),
    }
}

/// Time zone in which bucket labels are rendered.
///
/// Timestamps that carry an offset are converted into this zone. Naive
/// timestamps are already local wall-clock time and are taken as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone {
    offset: FixedOffset,
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl DisplayZone {
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn wall_clock(&self, raw: &str) -> Result<NaiveDateTime, BucketError> {
        let raw = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z"))
        {
            return Ok(instant.with_timezone(&self.offset).naive_local());
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|source| BucketError::MalformedTimestamp {
                raw: raw.to_string(),
                source,
            })
    }
}

/// `MM/DD HH:mm` on a 24-hour clock. The year is dropped.
pub fn display_label(instant: &NaiveDateTime) -> String {
    instant.format(LABEL_FORMAT).to_string()
}

/// Collapses each partition into one bucket per display label. Raw
/// timestamps that share a label land in the same bucket, and a later row
/// overwrites an earlier one under the same cluster key.
///
/// Buckets come back in first-seen label order; [`fill_gaps`] sorts them.
pub fn format_buckets(
    partitions: PartitionMap,
    zone: DisplayZone,
) -> Result<EventCountBucketInfo, BucketError> {
    let mut buckets: Vec<EventCountBucket> = Vec::with_capacity(partitions.len());
    let mut by_label: HashMap<String, usize> = HashMap::with_capacity(partitions.len());
    let mut cluster_keys = ClusterKeys::default();

    for (raw, rows) in partitions {
        let instant = zone.wall_clock(&raw)?;
        let label = display_label(&instant);
        let slot = match by_label.get(&label) {
            Some(&slot) => slot,
            None => {
                by_label.insert(label.clone(), buckets.len());
                buckets.push(EventCountBucket::empty(label, instant));
                buckets.len() - 1
            }
        };

        let bucket = &mut buckets[slot];
        for row in rows {
            let key = derive_key(&row.cluster_id, row.cluster_name.as_deref());
            cluster_keys.insert(&key);
            bucket.values.insert(
                key,
                ClusterPoint {
                    id: row.cluster_id,
                    value: row.event_count,
                },
            );
        }
    }

    Ok(EventCountBucketInfo {
        buckets,
        cluster_keys,
    })
}

/// Sorts buckets chronologically and inserts an empty bucket for every hour
/// between the first and last one that has no data.
///
/// Existing buckets are matched by instant; the display label only names
/// the empty buckets. A bucket whose instant is not a whole number of hours
/// after the first bucket is never reached and is left out.
pub fn fill_gaps(mut buckets: Vec<EventCountBucket>) -> Vec<EventCountBucket> {
    buckets.sort_by_key(|bucket| bucket.instant);
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return Vec::new();
    };
    let (start, end) = (first.instant, last.instant);

    let received = buckets.len();
    let mut by_instant: HashMap<NaiveDateTime, EventCountBucket> =
        HashMap::with_capacity(received);
    for bucket in buckets {
        by_instant.entry(bucket.instant).or_insert(bucket);
    }

    let mut filled = Vec::new();
    let mut matched = 0usize;
    let mut cursor = start;
    while cursor <= end {
        match by_instant.remove(&cursor) {
            Some(bucket) => {
                matched += 1;
                filled.push(bucket);
            }
            None => filled.push(EventCountBucket::empty(display_label(&cursor), cursor)),
        }
        cursor += Duration::hours(1);
    }

    if matched < received {
        warn!(
            skipped = received - matched,
            "buckets off the hourly grid were left out"
        );
    }

    filled
}
