use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod booking;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(web::scope("/api").configure(booking::config_routes));

    cfg.configure(json_error::config_routes);
}
