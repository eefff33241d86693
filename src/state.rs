use crate::config::Config;
use crate::types::record::FlatRecord;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    batches: Arc<DashMap<String, CachedBatch>>,
}

#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub user_id: String,
    pub file_count: usize,
    pub records: Vec<FlatRecord>,
    pub received_at: DateTime<Utc>,
}

struct CachedBatch {
    batch: NormalizedBatch,
    inserted_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            batches: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, batch_id: String, batch: NormalizedBatch) {
        self.batches.insert(
            batch_id,
            CachedBatch {
                batch,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, batch_id: &str) -> Option<NormalizedBatch> {
        self.batches.get(batch_id).map(|entry| entry.batch.clone())
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.batches
            .retain(|_, cached| now.duration_since(cached.inserted_at) < ttl);
        tracing::info!("Batch eviction complete. Current size: {}", self.batches.len());
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
