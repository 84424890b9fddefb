use actix_web::web;

use crate::handlers::booking::submit_booking;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/booking", web::post().to(submit_booking));
}
