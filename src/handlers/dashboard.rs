//! 共享看板接口
//!
//! - GET /dashboard - 当前状态和视图
//! - PUT /dashboard/filter - 输入过滤关键字（防抖）
//! - POST /dashboard/sort/{column} - 点击表头循环排序
//! - DELETE /dashboard/sort - 清除排序
//! - PUT /dashboard/view - 设置视图模式
//! - POST /dashboard/view/toggle - 切换视图模式

use actix_web::{web, HttpResponse, Result};

use crate::models::{ApiResponse, Column, DashboardView, FilterInput, ViewInput};
use crate::state::AppState;

pub async fn get_dashboard(state: web::Data<AppState>) -> Result<HttpResponse> {
    let view = state.session.view().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// 输入过滤关键字，防抖结束后生效，立即返回 202
pub async fn input_filter(
    state: web::Data<AppState>,
    body: web::Json<FilterInput>,
) -> Result<HttpResponse> {
    let input = body.into_inner();
    let dashboard = state.session.input(input.query).await;
    let message = format!(
        "Filter applies after {} ms",
        state.session.debounce_delay().as_millis()
    );
    Ok(HttpResponse::Accepted().json(ApiResponse::with_message(dashboard, &message)))
}

pub async fn activate_sort(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let column = match path.into_inner().parse::<Column>() {
        Ok(column) => column,
        Err(e) => {
            let response = ApiResponse::<DashboardView>::error(e.to_string());
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let sort = state.session.activate_sort(column).await;
    log::debug!("排序: {} -> {:?}", column, sort);
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.session.view().await)))
}

pub async fn clear_sort(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.session.clear_sort().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.session.view().await)))
}

pub async fn set_view(
    state: web::Data<AppState>,
    body: web::Json<ViewInput>,
) -> Result<HttpResponse> {
    state.session.set_mode(body.mode).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.session.view().await)))
}

pub async fn toggle_view(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mode = state.session.toggle_mode().await;
    log::debug!("视图模式: {}", mode.id());
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.session.view().await)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .route("", web::get().to(get_dashboard))
            .route("/filter", web::put().to(input_filter))
            .route("/sort", web::delete().to(clear_sort))
            .route("/sort/{column}", web::post().to(activate_sort))
            .route("/view", web::put().to(set_view))
            .route("/view/toggle", web::post().to(toggle_view)),
    );
}
