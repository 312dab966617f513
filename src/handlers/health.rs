use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::models::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    records: usize,
    source: String,
    loaded_at: String,
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let info = &state.dataset.info;
    let health = Health {
        status: "ok",
        records: info.records,
        source: info.source.clone(),
        loaded_at: info.loaded_at.clone(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(health, "Service is healthy")))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
