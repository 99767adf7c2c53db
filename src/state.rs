use crate::buckets::DisplayZone;
use crate::source::RowSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RowSource>,
    pub zone: DisplayZone,
}

impl AppState {
    pub fn new(source: impl RowSource + 'static, zone: DisplayZone) -> Self {
        Self {
            source: Arc::new(source),
            zone,
        }
    }
}
