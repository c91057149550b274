// Service exports
pub mod appwrite;
pub mod cache;
pub mod compatibility;
pub mod memory;
pub mod postgres;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CacheError, ResultCache};
pub use compatibility::CompatibilityService;
pub use memory::MemoryStore;
pub use postgres::{PostgresClient, PostgresError};

use async_trait::async_trait;
use thiserror::Error;
use crate::models::{BasicInfo, PairKey, StoredCompatibility, UserProfile};

/// Errors surfaced by the external collaborators
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Appwrite error: {0}")]
    Appwrite(#[from] AppwriteError),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Source of AI-parsed profiles
///
/// `None` means parsing has not completed for that user yet.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ServiceError>;
}

/// Source of onboarding basic-info records
#[async_trait]
pub trait BasicInfoSource: Send + Sync {
    async fn get_basic_info(&self, user_id: &str) -> Result<Option<BasicInfo>, ServiceError>;
}

/// Store of computed results, at most one per unordered pair
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Insert or replace the result for the record's pair
    async fn upsert_result(&self, record: &StoredCompatibility) -> Result<(), ServiceError>;

    async fn get_result(&self, key: &PairKey) -> Result<Option<StoredCompatibility>, ServiceError>;

    /// Drop the result for a pair; returns whether one existed
    async fn remove_result(&self, key: &PairKey) -> Result<bool, ServiceError>;

    async fn health_check(&self) -> Result<bool, ServiceError> {
        Ok(true)
    }
}
