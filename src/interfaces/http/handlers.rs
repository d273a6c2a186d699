use super::responses::{HelloResponse, PredictionResponse};
use crate::application::prediction::PredictionService;
use crate::domain::errors::ApiError;
use crate::infrastructure::observability::metrics::{ENDPOINT_HELLO, OUTCOME_SUCCESS};
use actix_web::{HttpResponse, web};

/// GET /api/hello
pub async fn hello(service: web::Data<PredictionService>) -> HttpResponse {
    service.metrics().inc_requests(ENDPOINT_HELLO, OUTCOME_SUCCESS);
    HttpResponse::Ok().json(HelloResponse::default())
}

/// POST /api/cereal
///
/// The body is read as raw bytes so that malformed JSON and content-type
/// mismatches are reported with the service's own error payloads.
pub async fn predict_cereal(
    service: web::Data<PredictionService>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let result = service.handle(&body)?;
    Ok(HttpResponse::Ok().json(PredictionResponse::from(result)))
}
