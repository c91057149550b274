use crate::models::{BasicInfo, UserProfile};
use crate::services::{BasicInfoSource, ProfileSource, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Reads the two per-user documents the engine needs:
/// - AI-parsed profiles
/// - Onboarding basic info (gender, sexuality, age preferences)
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub user_profiles: String,
    pub user_basic_info: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    /// Fetch the parsed profile for a user, if parsing has completed
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppwriteError> {
        let profile: Option<UserProfile> = self
            .fetch_user_document(&self.collections.user_profiles, user_id)
            .await?;

        Ok(profile.map(UserProfile::normalized))
    }

    /// Fetch the onboarding basic info for a user
    pub async fn fetch_basic_info(
        &self,
        user_id: &str,
    ) -> Result<Option<BasicInfo>, AppwriteError> {
        self.fetch_user_document(&self.collections.user_basic_info, user_id)
            .await
    }

    /// Fetch the first document in a collection whose `userId` matches
    async fn fetch_user_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Option<T>, AppwriteError> {
        let query = serde_json::json!({
            "method": "equal",
            "attribute": "userId",
            "values": [user_id],
        })
        .to_string();

        let url = format!(
            "{}/databases/{}/collections/{}/documents?queries[]={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection,
            urlencoding::encode(&query)
        );

        tracing::debug!("Fetching {} document for user: {}", collection, user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!(
                "Failed to fetch {} for {}: {} - {}",
                collection,
                user_id,
                status,
                body
            );
            return Err(AppwriteError::ApiError(format!(
                "Failed to fetch {}: {}",
                collection, status
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        let Some(doc) = documents.first() else {
            tracing::debug!("No {} document for user {}", collection, user_id);
            return Ok(None);
        };

        // Older documents nest their fields under `data`
        let data = doc.get("data").unwrap_or(doc);

        serde_json::from_value(data.clone())
            .map(Some)
            .map_err(|e| {
                AppwriteError::InvalidResponse(format!("Failed to parse {}: {}", collection, e))
            })
    }
}

#[async_trait]
impl ProfileSource for AppwriteClient {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.fetch_profile(user_id).await?)
    }
}

#[async_trait]
impl BasicInfoSource for AppwriteClient {
    async fn get_basic_info(&self, user_id: &str) -> Result<Option<BasicInfo>, ServiceError> {
        Ok(self.fetch_basic_info(user_id).await?)
    }
}
