use crate::errors::SourceError;
use crate::models::{ClusterRow, ClusteringRunRow, PageUrlRow, RawRow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Backend that owns browse events and their cluster assignments.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn event_bucket_rows(&self, clustering_run: &str) -> Result<Vec<RawRow>, SourceError>;

    async fn clustering_runs(&self) -> Result<Vec<ClusteringRunRow>, SourceError>;

    async fn clusters(&self) -> Result<Vec<ClusterRow>, SourceError>;

    async fn pages_in_cluster(&self, cluster_id: &str) -> Result<Vec<PageUrlRow>, SourceError>;
}

#[derive(Debug, Clone)]
pub struct HttpRowSource {
    client: Client,
    base_url: String,
}

impl HttpRowSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "fetching from backend");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RowSource for HttpRowSource {
    async fn event_bucket_rows(&self, clustering_run: &str) -> Result<Vec<RawRow>, SourceError> {
        self.get_json("/get_event_buckets", &[("clustering_run", clustering_run)])
            .await
    }

    async fn clustering_runs(&self) -> Result<Vec<ClusteringRunRow>, SourceError> {
        self.get_json("/get_clustering_runs", &[]).await
    }

    async fn clusters(&self) -> Result<Vec<ClusterRow>, SourceError> {
        self.get_json("/get_clusters", &[]).await
    }

    async fn pages_in_cluster(&self, cluster_id: &str) -> Result<Vec<PageUrlRow>, SourceError> {
        self.get_json("/get_pages", &[("cluster_id", cluster_id)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let source = HttpRowSource::new("http://localhost:8000/");
        assert_eq!(source.base_url(), "http://localhost:8000");
    }
}
