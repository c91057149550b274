use serde::{Deserialize, Serialize};
use crate::models::domain::{CompatibilityResult, PairKey};

/// Response for the compute endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResponse {
    #[serde(rename = "pairKey")]
    pub pair_key: PairKey,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CompatibilityResult>,
}

/// Response for the eligibility endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResponse {
    #[serde(rename = "genderCompatible")]
    pub gender_compatible: bool,
    #[serde(rename = "ageCompatible")]
    pub age_compatible: bool,
    pub eligible: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
