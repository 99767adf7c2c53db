use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One row of `GET /get_event_buckets`: the event count of a single cluster
/// within a single hourly bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub timestamp_bucket: String,
    pub cluster_id: String,
    #[serde(default)]
    pub cluster_name: Option<String>,
    pub event_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringRunRow {
    pub clustering_run: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRow {
    pub id: String,
    pub name: String,
    pub clustering_run: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageUrlRow {
    pub page_url: String,
}

/// Display key of a cluster, always prefixed with `Cluster: `.
///
/// Keys are lossy: two clusters whose names share their first three words
/// end up under the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ClusterKey(String);

impl ClusterKey {
    pub const PREFIX: &'static str = "Cluster: ";

    pub(crate) fn with_label(label: &str) -> Self {
        Self(format!("{}{label}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cluster keys in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterKeys(Vec<ClusterKey>);

impl ClusterKeys {
    /// Appends `key` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, key: &ClusterKey) -> bool {
        if self.0.contains(key) {
            return false;
        }
        self.0.push(key.clone());
        true
    }

    pub fn contains(&self, key: &ClusterKey) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClusterKey> {
        self.0.iter()
    }
}

/// A bucket value together with the id of the cluster that produced it, so a
/// renderer can tell apart clusters that share a display key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterPoint {
    pub id: String,
    pub value: u64,
}

/// All cluster values of one display timestamp.
///
/// `instant` is the wall-clock time the bucket stands for. It orders buckets
/// and drives gap filling but is never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCountBucket {
    pub timestamp_bucket: String,
    pub instant: NaiveDateTime,
    pub values: BTreeMap<ClusterKey, ClusterPoint>,
}

impl EventCountBucket {
    pub fn empty(timestamp_bucket: String, instant: NaiveDateTime) -> Self {
        Self {
            timestamp_bucket,
            instant,
            values: BTreeMap::new(),
        }
    }

    pub fn value(&self, key: &ClusterKey) -> Option<u64> {
        self.values.get(key).map(|point| point.value)
    }

    pub fn total(&self) -> u64 {
        self.values
            .values()
            .fold(0u64, |sum, point| sum.saturating_add(point.value))
    }

    /// Chart row view. With `with_ids`, each key maps to `{ id, value }`
    /// instead of a bare count.
    pub fn chart(&self, with_ids: bool) -> ChartBucket<'_> {
        ChartBucket {
            bucket: self,
            with_ids,
        }
    }
}

impl Serialize for EventCountBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.chart(false).serialize(serializer)
    }
}

pub struct ChartBucket<'a> {
    bucket: &'a EventCountBucket,
    with_ids: bool,
}

impl Serialize for ChartBucket<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bucket.values.len() + 1))?;
        map.serialize_entry("timestamp_bucket", &self.bucket.timestamp_bucket)?;
        for (key, point) in &self.bucket.values {
            if self.with_ids {
                map.serialize_entry(key, point)?;
            } else {
                map.serialize_entry(key, &point.value)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventCountBucketInfo {
    pub buckets: Vec<EventCountBucket>,
    pub cluster_keys: ClusterKeys,
}

impl EventCountBucketInfo {
    pub fn total_events(&self) -> u64 {
        self.buckets
            .iter()
            .fold(0u64, |sum, bucket| sum.saturating_add(bucket.total()))
    }
}

#[derive(Debug, Deserialize)]
pub struct EventBucketsQuery {
    #[serde(default)]
    pub clustering_run: String,
    #[serde(default)]
    pub with_ids: bool,
}

#[derive(Debug, Deserialize)]
pub struct PagesQuery {
    #[serde(default)]
    pub cluster_id: String,
}

#[derive(Debug)]
pub struct EventBucketsResponse {
    pub info: EventCountBucketInfo,
    pub with_cluster_ids: bool,
}

impl Serialize for EventBucketsResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let buckets: Vec<ChartBucket<'_>> = self
            .info
            .buckets
            .iter()
            .map(|bucket| bucket.chart(self.with_cluster_ids))
            .collect();

        let mut state = serializer.serialize_struct("EventBucketsResponse", 3)?;
        state.serialize_field("buckets", &buckets)?;
        state.serialize_field("cluster_keys", &self.info.cluster_keys)?;
        state.serialize_field("total_events", &self.info.total_events())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn sample_bucket() -> EventCountBucket {
        let mut bucket = EventCountBucket::empty("03/01 09:00".to_string(), nine_am());
        bucket.values.insert(
            ClusterKey::with_label("News"),
            ClusterPoint {
                id: "c1".to_string(),
                value: 4,
            },
        );
        bucket
    }

    #[test]
    fn bucket_serializes_as_flat_chart_row() {
        let value = serde_json::to_value(sample_bucket()).unwrap();
        assert_eq!(
            value,
            json!({ "timestamp_bucket": "03/01 09:00", "Cluster: News": 4 })
        );
    }

    #[test]
    fn bucket_with_ids_carries_cluster_id() {
        let bucket = sample_bucket();
        let value = serde_json::to_value(bucket.chart(true)).unwrap();
        assert_eq!(
            value,
            json!({
                "timestamp_bucket": "03/01 09:00",
                "Cluster: News": { "id": "c1", "value": 4 }
            })
        );
    }

    #[test]
    fn synthetic_bucket_has_only_timestamp() {
        let bucket = EventCountBucket::empty("03/01 10:00".to_string(), nine_am());
        let value = serde_json::to_value(&bucket).unwrap();
        assert_eq!(value, json!({ "timestamp_bucket": "03/01 10:00" }));
    }

    #[test]
    fn cluster_keys_keep_first_seen_order() {
        let mut keys = ClusterKeys::default();
        assert!(keys.insert(&ClusterKey::with_label("b")));
        assert!(keys.insert(&ClusterKey::with_label("a")));
        assert!(!keys.insert(&ClusterKey::with_label("b")));
        let order: Vec<&str> = keys.iter().map(ClusterKey::as_str).collect();
        assert_eq!(order, vec!["Cluster: b", "Cluster: a"]);
    }

    #[test]
    fn response_reports_total_events() {
        let mut keys = ClusterKeys::default();
        keys.insert(&ClusterKey::with_label("News"));
        let response = EventBucketsResponse {
            info: EventCountBucketInfo {
                buckets: vec![sample_bucket(), sample_bucket()],
                cluster_keys: keys,
            },
            with_cluster_ids: false,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["total_events"], json!(8));
        assert_eq!(value["cluster_keys"], json!(["Cluster: News"]));
        assert_eq!(value["buckets"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn raw_row_accepts_null_cluster_name() {
        let row: RawRow = serde_json::from_value(json!({
            "timestamp_bucket": "2024-03-01T09:00:00",
            "cluster_id": "c2",
            "cluster_name": null,
            "event_count": 3
        }))
        .unwrap();
        assert_eq!(row.cluster_name, None);
        assert_eq!(row.event_count, 3);
    }
}
