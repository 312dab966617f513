//! 看板页面
//!
//! GET /?q=tech&sort=potential&dir=desc&view=cards
//!
//! 页面状态完全由链接参数决定，无效参数忽略并记录警告

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, Result};

use super::parse_sort;
use crate::models::{DashboardState, PageQuery, ViewMode};
use crate::services::dashboard::compute_view;
use crate::state::AppState;

fn page_state(query: &PageQuery, default_view: ViewMode) -> DashboardState {
    let sort = parse_sort(query.sort.as_deref(), query.dir.as_deref()).unwrap_or_else(|e| {
        log::warn!("忽略无效的排序参数: {}", e);
        None
    });

    let mode = match query.view.as_deref() {
        Some(view) => view.parse().unwrap_or_else(|e| {
            log::warn!("忽略无效的视图参数: {}", e);
            default_view
        }),
        None => default_view,
    };

    let q = query.q.clone().unwrap_or_default();
    DashboardState {
        draft: q.clone(),
        query: q,
        sort,
        mode,
    }
}

pub async fn index(state: web::Data<AppState>, query: web::Query<PageQuery>) -> Result<HttpResponse> {
    let dashboard = page_state(&query, state.display.default_view);
    let view = compute_view(&state.dataset.records, &state.display, &state.fields, dashboard);

    match state.renderer.render(&view, &state.dataset.info) {
        Ok(html) => Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html)),
        Err(e) => {
            log::error!("{}", e);
            Ok(HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Failed to render dashboard"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
}
