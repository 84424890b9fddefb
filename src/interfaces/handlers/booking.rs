use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    constants::{MSG_ABSORBED, MSG_DISPATCHED},
    entities::booking::{BookingSubmission, ResponseEnvelope},
    errors::BookingError,
    use_cases::booking::BookingOutcome,
    utils::get_client_ip::get_client_ip,
    AppState,
};

pub async fn submit_booking(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<BookingSubmission>,
) -> Result<HttpResponse, BookingError> {
    let client_ip = get_client_ip(&req, state.config.trust_proxy_headers);

    let outcome = state
        .booking_handler
        .submit(form.into_inner(), &client_ip)
        .await?;

    let message = match outcome {
        BookingOutcome::Absorbed => MSG_ABSORBED,
        BookingOutcome::Dispatched => MSG_DISPATCHED,
    };

    Ok(HttpResponse::Ok().json(ResponseEnvelope::ok(message)))
}
