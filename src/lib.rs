pub mod aggregate;
pub mod app;
pub mod buckets;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod source;
pub mod state;
pub mod ui;

pub use aggregate::{aggregate_rows, get_event_bucket_data};
pub use app::router;
pub use buckets::DisplayZone;
pub use config::Config;
pub use models::{ClusterKey, ClusterKeys, EventCountBucket, EventCountBucketInfo, RawRow};
pub use source::{HttpRowSource, RowSource};
pub use state::AppState;
