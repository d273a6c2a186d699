//! HTTP surface of the calorie service.
//!
//! | Method | Path          | Handler                       |
//! |--------|---------------|-------------------------------|
//! | GET    | `/api/hello`  | [`handlers::hello`]           |
//! | POST   | `/api/cereal` | [`handlers::predict_cereal`]  |

pub mod handlers;
pub mod responses;

use actix_cors::Cors;
use actix_web::web;

/// Registers every API route. Handlers expect a
/// `web::Data<PredictionService>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/hello", web::get().to(handlers::hello))
            .route("/cereal", web::post().to(handlers::predict_cereal)),
    );
}

/// Cross-origin policy: any origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}
