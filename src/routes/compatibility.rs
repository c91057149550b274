use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{is_age_compatible, is_gender_compatible, PairOutcome};
use crate::models::{
    CompatibilityResponse, ComputeCompatibilityRequest, EligibilityRequest, EligibilityResponse,
    ErrorResponse, HealthResponse, PairKey, PairQuery, PreviewCompatibilityRequest,
};
use crate::services::CompatibilityService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CompatibilityService>,
}

/// Configure all compatibility routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/compatibility", web::get().to(get_compatibility))
        .route("/compatibility/compute", web::post().to(compute_compatibility))
        .route("/compatibility/preview", web::post().to(preview_compatibility))
        .route("/eligibility", web::post().to(check_eligibility));
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn internal_error(error: &str, e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.service.health_check().await { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compute and store compatibility for a pair
///
/// POST /api/v1/compatibility/compute
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string"
/// }
/// ```
async fn compute_compatibility(
    state: web::Data<AppState>,
    req: web::Json<ComputeCompatibilityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for compute request: {:?}", errors);
        return bad_request(errors.to_string());
    }

    if req.user_id == req.target_user_id {
        return bad_request("userId and targetUserId must differ".to_string());
    }

    let outcome = match state.service.compute_pair(&req.user_id, &req.target_user_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Failed to compute {} / {}: {}", req.user_id, req.target_user_id, e);
            return internal_error("Failed to compute compatibility", e);
        }
    };

    let status = outcome.status().to_string();
    let (reason, result) = match outcome {
        PairOutcome::Scored(result) => (None, Some(result)),
        PairOutcome::Ineligible(reason) => (Some(reason.as_str().to_string()), None),
        PairOutcome::Unscorable => (Some("profile_missing".to_string()), None),
    };

    HttpResponse::Ok().json(CompatibilityResponse {
        pair_key: PairKey::new(&req.user_id, &req.target_user_id),
        status,
        reason,
        result,
    })
}

/// Fetch a previously computed result
///
/// GET /api/v1/compatibility?userId={userId}&targetUserId={targetUserId}
async fn get_compatibility(
    state: web::Data<AppState>,
    query: web::Query<PairQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request(errors.to_string());
    }

    match state.service.stored_result(&query.user_id, &query.target_user_id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: format!(
                "No compatibility result for {}",
                PairKey::new(&query.user_id, &query.target_user_id)
            ),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!(
                "Failed to fetch result for {} / {}: {}",
                query.user_id,
                query.target_user_id,
                e
            );
            internal_error("Failed to fetch compatibility", e)
        }
    }
}

/// Score two inline profiles; nothing is persisted
///
/// POST /api/v1/compatibility/preview
async fn preview_compatibility(
    state: web::Data<AppState>,
    req: web::Json<PreviewCompatibilityRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let a = req.profile_a.normalized();
    let b = req.profile_b.normalized();

    HttpResponse::Ok().json(state.service.matcher().compute(&a, &b))
}

/// Eligibility of two inline basic-info records
///
/// POST /api/v1/eligibility
async fn check_eligibility(req: web::Json<EligibilityRequest>) -> impl Responder {
    let gender_compatible = is_gender_compatible(&req.me, &req.them);
    let age_compatible =
        is_age_compatible(&req.me, &req.them) && is_age_compatible(&req.them, &req.me);

    HttpResponse::Ok().json(EligibilityResponse {
        gender_compatible,
        age_compatible,
        eligible: gender_compatible && age_compatible,
    })
}
