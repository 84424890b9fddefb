use actix_web::web;

use crate::errors::BookingError;

/// Malformed bodies (bad JSON, wrong types, oversized payloads) get the same
/// fixed 400 envelope as schema violations; detail stays in the logs.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("rejected request body: {}", err);
        BookingError::Validation(Vec::new()).into()
    }));
}
