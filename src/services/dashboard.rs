//! 股票看板
//!
//! 持有只读的记录集合和交互状态（过滤条件、排序、视图模式），
//! 每次交互后重新计算过滤、排序后的视图。原始记录不会被修改。

use std::sync::Arc;

use super::display::display_attrs;
use super::filter::Filter;
use super::sort::{cycle, sort_records};
use crate::config::{DisplayConfig, FilterConfig};
use crate::models::{
    Column, DashboardState, DashboardView, SortKey, StockRecord, StockRow, ViewMode,
};

/// 实际参与搜索的字段
pub fn search_fields(filter: &FilterConfig, display: &DisplayConfig) -> Vec<Column> {
    if filter.search_visible_columns {
        display.visible_columns()
    } else {
        filter.search_fields.clone()
    }
}

/// 计算视图：过滤 -> 排序 -> 派生展示属性
pub fn compute_view(
    records: &[StockRecord],
    display: &DisplayConfig,
    fields: &[Column],
    state: DashboardState,
) -> DashboardView {
    let filter = Filter::new(&state.query, fields);
    let mut matched = filter.apply(records);
    sort_records(&mut matched, state.sort);

    let rows: Vec<StockRow> = matched
        .into_iter()
        .map(|record| StockRow {
            record: record.clone(),
            display: display_attrs(display, record),
        })
        .collect();

    DashboardView {
        state,
        total: records.len(),
        matched: rows.len(),
        rows,
    }
}

/// 看板
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Arc<[StockRecord]>,
    display: Arc<DisplayConfig>,
    fields: Vec<Column>,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(
        records: Arc<[StockRecord]>,
        display: Arc<DisplayConfig>,
        filter: &FilterConfig,
    ) -> Self {
        let fields = search_fields(filter, &display);
        let state = DashboardState {
            mode: display.default_view,
            ..Default::default()
        };
        Self {
            records,
            display,
            fields,
            state,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[cfg(test)]
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    /// 记录输入框内容，不改变已生效的过滤条件
    pub fn set_draft(&mut self, draft: &str) {
        self.state.draft = draft.to_string();
    }

    /// 应用过滤条件
    pub fn set_query(&mut self, query: &str) {
        log::debug!("应用过滤条件: {:?}", query);
        self.state.query = query.to_string();
    }

    /// 点击表头：在 升序 -> 降序 -> 未排序 之间循环
    pub fn activate_sort(&mut self, column: Column) -> Option<SortKey> {
        self.state.sort = cycle(self.state.sort, column);
        self.state.sort
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.state.sort = sort;
    }

    /// 切换视图模式，过滤和排序状态保持不变
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.state.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> ViewMode {
        self.state.mode = self.state.mode.toggled();
        self.state.mode
    }

    pub fn view(&self) -> DashboardView {
        compute_view(&self.records, &self.display, &self.fields, self.state.clone())
    }
}
