//! 股票数据接口
//!
//! - GET /stocks - 过滤、排序后的列表（无状态）
//! - GET /stocks/groups - 分组图例
//! - GET /stocks/{symbol} - 单只股票

use actix_web::{web, HttpResponse, Result};

use super::parse_sort;
use crate::models::{ApiResponse, Column, DashboardState, DashboardView, StockQuery, StockRow};
use crate::services::dashboard::compute_view;
use crate::services::display::{display_attrs, group_legend};
use crate::state::AppState;

fn parse_fields(fields: Option<&str>, default: &[Column]) -> anyhow::Result<Vec<Column>> {
    let fields: Vec<Column> = match fields {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<anyhow::Result<_>>()?,
        None => Vec::new(),
    };
    if fields.is_empty() {
        return Ok(default.to_vec());
    }
    Ok(fields)
}

fn stock_view(state: &AppState, query: &StockQuery) -> anyhow::Result<DashboardView> {
    let sort = parse_sort(query.sort.as_deref(), query.dir.as_deref())?;
    let fields = parse_fields(query.fields.as_deref(), &state.fields)?;
    let dashboard = DashboardState {
        query: query.q.clone().unwrap_or_default(),
        sort,
        mode: state.display.default_view,
        ..Default::default()
    };
    Ok(compute_view(&state.dataset.records, &state.display, &fields, dashboard))
}

/// 获取股票列表
///
/// GET /api/v1/stocks?q=bull&sort=pe&dir=asc&fields=stock,trend
pub async fn list_stocks(
    state: web::Data<AppState>,
    query: web::Query<StockQuery>,
) -> Result<HttpResponse> {
    match stock_view(&state, &query) {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(e) => {
            log::warn!("股票列表参数无效: {}", e);
            let response = ApiResponse::<DashboardView>::error(e.to_string());
            Ok(HttpResponse::BadRequest().json(response))
        }
    }
}

/// 获取分组图例
pub async fn list_groups(state: web::Data<AppState>) -> Result<HttpResponse> {
    let legend = group_legend(&state.display, &state.dataset.records);
    Ok(HttpResponse::Ok().json(ApiResponse::success(legend)))
}

/// 获取单只股票（代码不区分大小写）
///
/// GET /api/v1/stocks/{symbol}
pub async fn get_stock(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();
    let record = state.dataset.records.iter().find(|r| {
        r.symbol
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(symbol.trim()))
    });

    match record {
        Some(record) => {
            let row = StockRow {
                record: record.clone(),
                display: display_attrs(&state.display, record),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(row)))
        }
        None => {
            let response = ApiResponse::<StockRow>::error(format!("未找到股票: {}", symbol));
            Ok(HttpResponse::NotFound().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("", web::get().to(list_stocks))
            .route("/groups", web::get().to(list_groups))
            .route("/{symbol}", web::get().to(get_stock)),
    );
}
