//! 应用共享状态

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, DisplayConfig};
use crate::models::Column;
use crate::services::dashboard::{search_fields, Dashboard};
use crate::services::dataset::Dataset;
use crate::services::render::PageRenderer;
use crate::services::session::DashboardSession;

/// 所有 worker 共用的状态，通过 `web::Data` 注入
pub struct AppState {
    pub dataset: Dataset,
    pub display: Arc<DisplayConfig>,
    /// 默认搜索字段
    pub fields: Vec<Column>,
    pub session: DashboardSession,
    pub renderer: PageRenderer,
}

impl AppState {
    pub fn new(dataset: Dataset, config: &AppConfig) -> Result<Self> {
        let display = Arc::new(config.display.clone());
        let fields = search_fields(&config.filter, &display);
        let renderer = PageRenderer::new(&display)?;

        let dashboard = Dashboard::new(dataset.records.clone(), display.clone(), &config.filter);
        let session = DashboardSession::new(
            dashboard,
            Duration::from_millis(config.filter.debounce_ms),
        );

        Ok(Self {
            dataset,
            display,
            fields,
            session,
            renderer,
        })
    }
}
