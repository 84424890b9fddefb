use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use redis::AsyncCommands;
use serde::Serialize;
use sysinfo::System;

use crate::{constants::START_TIME, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    redis_status: String,
    version: String,
    system: SystemInfo,
}

#[derive(Serialize)]
struct SystemInfo {
    os: String,
    hostname: String,
    cpu_count: usize,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = chrono::Utc::now();
    let uptime_secs = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let redis_status = match &state.redis_pool {
        Some(pool) => match pool.get().await {
            Ok(mut conn) => match conn.ping::<String>().await {
                Ok(_) => "OK",
                Err(_) => "Unavailable",
            },
            Err(_) => "Unavailable",
        },
        None => "Not configured",
    };

    let mut sys = System::new_all();
    sys.refresh_all();
    let response = HealthCheckResponse {
        status: "Ok".to_string(),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now.to_rfc3339(),
        redis_status: redis_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        system: SystemInfo {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
            cpu_count: sys.cpus().len(),
        },
    };

    HttpResponse::Ok().json(response)
}
