use crate::buckets::{fill_gaps, format_buckets, partition, DisplayZone};
use crate::errors::{AggregateError, BucketError};
use crate::models::{EventCountBucketInfo, RawRow};
use crate::source::RowSource;
use tracing::debug;

/// Fetches the rows of `clustering_run` and turns them into a gap-free,
/// chronological bucket series ready for a stacked chart.
pub async fn get_event_bucket_data(
    source: &dyn RowSource,
    clustering_run: &str,
    zone: DisplayZone,
) -> Result<EventCountBucketInfo, AggregateError> {
    let rows = source.event_bucket_rows(clustering_run).await?;
    Ok(aggregate_rows(rows, zone)?)
}

/// `cluster_keys` reflects real rows only; buckets added by gap filling
/// contribute nothing to it.
pub fn aggregate_rows(
    rows: Vec<RawRow>,
    zone: DisplayZone,
) -> Result<EventCountBucketInfo, BucketError> {
    let row_count = rows.len();
    let partitions = partition(rows);
    let partition_count = partitions.len();
    let EventCountBucketInfo {
        buckets,
        cluster_keys,
    } = format_buckets(partitions, zone)?;
    let formatted = buckets.len();
    let buckets = fill_gaps(buckets);

    debug!(
        rows = row_count,
        partitions = partition_count,
        formatted,
        filled = buckets.len(),
        keys = cluster_keys.len(),
        "aggregated event buckets"
    );

    Ok(EventCountBucketInfo {
        buckets,
        cluster_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::derive_key;
    use crate::errors::SourceError;
    use crate::models::{ClusterRow, ClusteringRunRow, PageUrlRow};
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemorySource {
        runs: HashMap<String, Vec<RawRow>>,
    }

    impl MemorySource {
        fn with_run(mut self, run: &str, rows: Vec<RawRow>) -> Self {
            self.runs.insert(run.to_string(), rows);
            self
        }
    }

    #[async_trait]
    impl RowSource for MemorySource {
        async fn event_bucket_rows(&self, clustering_run: &str) -> Result<Vec<RawRow>, SourceError> {
            match self.runs.get(clustering_run) {
                Some(rows) => Ok(rows.clone()),
                None => Err(SourceError::Status {
                    url: format!("memory://{clustering_run}"),
                    status: 404,
                }),
            }
        }

        async fn clustering_runs(&self) -> Result<Vec<ClusteringRunRow>, SourceError> {
            Ok(self
                .runs
                .keys()
                .map(|run| ClusteringRunRow {
                    clustering_run: run.clone(),
                })
                .collect())
        }

        async fn clusters(&self) -> Result<Vec<ClusterRow>, SourceError> {
            Ok(Vec::new())
        }

        async fn pages_in_cluster(&self, _cluster_id: &str) -> Result<Vec<PageUrlRow>, SourceError> {
            Ok(Vec::new())
        }
    }

    fn row(timestamp: &str, id: &str, name: Option<&str>, count: u64) -> RawRow {
        RawRow {
            timestamp_bucket: timestamp.to_string(),
            cluster_id: id.to_string(),
            cluster_name: name.map(str::to_string),
            event_count: count,
        }
    }

    #[tokio::test]
    async fn empty_run_yields_empty_info() {
        let source = MemorySource::default().with_run("empty", Vec::new());
        let info = get_event_bucket_data(&source, "empty", DisplayZone::default())
            .await
            .unwrap();

        assert!(info.buckets.is_empty());
        assert!(info.cluster_keys.is_empty());
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({ "buckets": [], "cluster_keys": [] })
        );
    }

    #[tokio::test]
    async fn run_is_sorted_and_gap_filled() {
        let source = MemorySource::default().with_run(
            "kmeans",
            vec![
                row("2024-03-01T11:00:00", "c2", None, 4),
                row("2024-03-01T09:00:00", "c1", Some("Evening News Review"), 5),
                row("2024-03-01T09:00:00", "c2", None, 1),
            ],
        );
        let info = get_event_bucket_data(&source, "kmeans", DisplayZone::default())
            .await
            .unwrap();

        let labels: Vec<&str> = info
            .buckets
            .iter()
            .map(|bucket| bucket.timestamp_bucket.as_str())
            .collect();
        assert_eq!(labels, vec!["03/01 09:00", "03/01 10:00", "03/01 11:00"]);
        assert!(info.buckets[1].values.is_empty());
        assert_eq!(info.buckets[2].value(&derive_key("c2", None)), Some(4));

        let keys: Vec<&str> = info.cluster_keys.iter().map(|key| key.as_str()).collect();
        assert_eq!(keys, vec!["Cluster: c2", "Cluster: Evening, News, Review"]);
        assert_eq!(info.total_events(), 10);
    }

    #[tokio::test]
    async fn single_row_gives_single_bucket() {
        let rows = vec![row("2024-03-01T09:00:00", "c1", None, 2)];
        let formatted = format_buckets(partition(rows.clone()), DisplayZone::default()).unwrap();
        let source = MemorySource::default().with_run("one", rows);

        let info = get_event_bucket_data(&source, "one", DisplayZone::default())
            .await
            .unwrap();
        assert_eq!(info.buckets, formatted.buckets);
        assert_eq!(info.buckets.len(), 1);
    }

    #[tokio::test]
    async fn source_failure_propagates() {
        let source = MemorySource::default();
        let err = get_event_bucket_data(&source, "missing", DisplayZone::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::Source(SourceError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn malformed_timestamp_propagates() {
        let source = MemorySource::default().with_run("bad", vec![row("later", "c1", None, 1)]);
        let err = get_event_bucket_data(&source, "bad", DisplayZone::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::Bucket(BucketError::MalformedTimestamp { .. })));
    }

    #[test]
    fn series_longer_than_a_year_stays_ascending() {
        let info = aggregate_rows(
            vec![
                row("2024-01-01T05:00:00", "c1", None, 1),
                row("2025-01-01T06:00:00", "c2", None, 2),
            ],
            DisplayZone::default(),
        )
        .unwrap();

        let buckets = &info.buckets;
        assert!(buckets.windows(2).all(|pair| pair[0].instant < pair[1].instant));
        let c2 = derive_key("c2", None);
        let with_c2: Vec<usize> = buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| bucket.value(&c2).is_some())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(with_c2, vec![buckets.len() - 1]);
        assert!(buckets[1].values.is_empty());
    }

    #[test]
    fn display_zone_shifts_offset_timestamps() {
        let zone = DisplayZone::from_offset_minutes(-300).unwrap();
        let info = aggregate_rows(
            vec![
                row("2024-03-01T14:00:00Z", "c1", None, 1),
                row("2024-03-01T16:00:00Z", "c1", None, 1),
            ],
            zone,
        )
        .unwrap();

        let labels: Vec<&str> = info
            .buckets
            .iter()
            .map(|bucket| bucket.timestamp_bucket.as_str())
            .collect();
        assert_eq!(labels, vec!["03/01 09:00", "03/01 10:00", "03/01 11:00"]);
    }
}
