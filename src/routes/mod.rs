// Route exports
pub mod compatibility;

use actix_web::{error, web, HttpResponse};
use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(compatibility::configure),
    );
}

/// JSON extractor config that answers malformed bodies with an `ErrorResponse`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        tracing::info!("Rejected JSON body on {}: {}", req.path(), err);
        let message = format!("Invalid JSON: {}", err);
        payload_error("invalid_json", message, err)
    })
}

/// Query extractor config that answers malformed query strings with an `ErrorResponse`
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query: {}", err);
        payload_error("invalid_query", message, err)
    })
}

fn payload_error<E>(kind: &str, message: String, cause: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: kind.to_string(),
        message,
        status_code: 400,
    });
    error::InternalError::from_response(cause, response).into()
}
