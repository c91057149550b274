use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{BasicInfo, UserProfile};

/// Request to compute (and persist) compatibility for a user pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComputeCompatibilityRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Query for a previously computed pair result
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PairQuery {
    #[validate(length(min = 1))]
    #[serde(rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "targetUserId")]
    pub target_user_id: String,
}

/// Score two inline profiles without touching any backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewCompatibilityRequest {
    #[serde(rename = "profileA")]
    pub profile_a: UserProfile,
    #[serde(rename = "profileB")]
    pub profile_b: UserProfile,
}

/// Check eligibility of two inline basic-info records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub me: BasicInfo,
    pub them: BasicInfo,
}
