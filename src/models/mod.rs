// Model exports
pub mod domain;
pub mod lenient;
pub mod requests;
pub mod responses;

pub use domain::{
    UserProfile, Traits, RelationshipStyle, FamilyPlans, Lifestyle, BasicInfo,
    CategoryScores, DealbreakerReport, CompatibilityResult, PairKey, StoredCompatibility,
};
pub use requests::{
    ComputeCompatibilityRequest, EligibilityRequest, PairQuery, PreviewCompatibilityRequest,
};
pub use responses::{CompatibilityResponse, EligibilityResponse, HealthResponse, ErrorResponse};
