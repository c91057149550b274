use std::sync::Arc;
use crate::core::{Matcher, PairOutcome, Participant};
use crate::models::{PairKey, StoredCompatibility};
use crate::services::{BasicInfoSource, ProfileSource, ResultCache, ResultSink, ServiceError};

/// Runs the matcher against the external collaborators
///
/// Fetches both users, evaluates the pair, and writes scored results to the
/// sink (and cache, when one is configured). A pair that no longer scores
/// loses any result stored earlier.
pub struct CompatibilityService {
    profiles: Arc<dyn ProfileSource>,
    basics: Arc<dyn BasicInfoSource>,
    sink: Arc<dyn ResultSink>,
    cache: Option<Arc<ResultCache>>,
    matcher: Matcher,
}

impl CompatibilityService {
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        basics: Arc<dyn BasicInfoSource>,
        sink: Arc<dyn ResultSink>,
        matcher: Matcher,
    ) -> Self {
        Self {
            profiles,
            basics,
            sink,
            cache: None,
            matcher,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    async fn participant(&self, user_id: &str) -> Result<Participant, ServiceError> {
        let (basic, profile) = tokio::try_join!(
            self.basics.get_basic_info(user_id),
            self.profiles.get_profile(user_id),
        )?;

        Ok(Participant {
            user_id: user_id.to_string(),
            basic: basic.unwrap_or_default(),
            profile,
        })
    }

    /// Evaluate a pair and persist the result when it was scored
    pub async fn compute_pair(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<PairOutcome, ServiceError> {
        let (me, them) = tokio::try_join!(
            self.participant(user_id),
            self.participant(target_user_id),
        )?;

        let outcome = self.matcher.evaluate_pair(&me, &them, chrono::Utc::now());

        match &outcome {
            PairOutcome::Scored(result) => {
                let record = StoredCompatibility::new(user_id, target_user_id, result.clone());
                self.sink.upsert_result(&record).await?;
                self.write_cache(&record).await;

                tracing::info!(
                    "Scored {}: overall {:.3}, dealbreakers passed: {}",
                    record.pair_key,
                    result.overall_score,
                    result.dealbreakers.passed
                );
            }
            PairOutcome::Ineligible(reason) => {
                tracing::info!("{} / {} ineligible ({})", user_id, target_user_id, reason.as_str());
                self.discard(&PairKey::new(user_id, target_user_id)).await?;
            }
            PairOutcome::Unscorable => {
                tracing::info!("{} / {} not scorable yet: no profile", user_id, target_user_id);
                self.discard(&PairKey::new(user_id, target_user_id)).await?;
            }
        }

        Ok(outcome)
    }

    /// Previously computed result for a pair, cache first
    pub async fn stored_result(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<Option<StoredCompatibility>, ServiceError> {
        let key = PairKey::new(user_id, target_user_id);

        if let Some(cache) = &self.cache {
            match cache.get_result(&key).await {
                Ok(Some(record)) => return Ok(Some(record)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Cache read failed for {}, falling back to store: {}", key, e)
                }
            }
        }

        let record = self.sink.get_result(&key).await?;
        if let Some(record) = &record {
            self.write_cache(record).await;
        }

        Ok(record)
    }

    pub async fn health_check(&self) -> bool {
        match self.sink.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Result store health check failed: {}", e);
                false
            }
        }
    }

    /// Drop any earlier result for a pair that no longer scores
    async fn discard(&self, key: &PairKey) -> Result<(), ServiceError> {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.evict(key).await {
                tracing::warn!("Failed to evict {} from cache: {}", key, e);
            }
        }

        if self.sink.remove_result(key).await? {
            tracing::info!("Removed stale result for {}", key);
        }

        Ok(())
    }

    async fn write_cache(&self, record: &StoredCompatibility) {
        let Some(cache) = &self.cache else {
            return;
        };

        if let Err(e) = cache.put_result(record).await {
            tracing::warn!("Failed to cache result for {}: {}", record.pair_key, e);
            // A half-written entry must not outlive the stored row
            if let Err(e) = cache.evict(&record.pair_key).await {
                tracing::warn!("Failed to evict {} from cache: {}", record.pair_key, e);
            }
        }
    }
}
