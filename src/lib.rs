//! Compat Engine - pairwise compatibility engine for dating app profiles
//!
//! Decides whether two users are mutually eligible (gender, sexuality and age
//! preferences) and scores how compatible their AI-parsed profiles are across
//! six weighted life-facet categories.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    compute_compatibility, is_age_compatible, is_gender_compatible, CategoryWeights,
    CompatibilityConfig, Matcher,
};
pub use models::{BasicInfo, CompatibilityResult, PairKey, UserProfile};
