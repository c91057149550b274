use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use crate::models::{BasicInfo, PairKey, StoredCompatibility, UserProfile};
use crate::services::{BasicInfoSource, ProfileSource, ResultSink, ServiceError};

/// In-process stand-in for every external collaborator
///
/// Useful for tests and local runs without Appwrite or PostgreSQL.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    basics: RwLock<HashMap<String, BasicInfo>>,
    results: RwLock<HashMap<PairKey, StoredCompatibility>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_profile(&self, user_id: &str, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.normalized());
    }

    pub async fn put_basic_info(&self, user_id: &str, info: BasicInfo) {
        self.basics.write().await.insert(user_id.to_string(), info);
    }

    /// Number of upserts received so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    pub async fn result_count(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl ProfileSource for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}

#[async_trait]
impl BasicInfoSource for MemoryStore {
    async fn get_basic_info(&self, user_id: &str) -> Result<Option<BasicInfo>, ServiceError> {
        Ok(self.basics.read().await.get(user_id).cloned())
    }
}

#[async_trait]
impl ResultSink for MemoryStore {
    async fn upsert_result(&self, record: &StoredCompatibility) -> Result<(), ServiceError> {
        self.results
            .write()
            .await
            .insert(record.pair_key.clone(), record.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get_result(&self, key: &PairKey) -> Result<Option<StoredCompatibility>, ServiceError> {
        Ok(self.results.read().await.get(key).cloned())
    }

    async fn remove_result(&self, key: &PairKey) -> Result<bool, ServiceError> {
        Ok(self.results.write().await.remove(key).is_some())
    }
}
