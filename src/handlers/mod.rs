pub mod dashboard;
pub mod health;
pub mod page;
pub mod stocks;

use actix_web::web;
use anyhow::Result;

use crate::models::{SortDirection, SortKey};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(stocks::config)
            .configure(dashboard::config),
    )
    .configure(page::config);
}

/// 解析 sort/dir 参数，方向缺省为升序
pub(crate) fn parse_sort(sort: Option<&str>, dir: Option<&str>) -> Result<Option<SortKey>> {
    let column = match sort.map(str::trim).filter(|s| !s.is_empty()) {
        Some(column) => column.parse()?,
        None => return Ok(None),
    };
    let direction = match dir.map(str::trim).filter(|s| !s.is_empty()) {
        Some(dir) => dir.parse()?,
        None => SortDirection::Ascending,
    };
    Ok(Some(SortKey { column, direction }))
}
