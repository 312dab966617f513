//! 共享看板
//!
//! 单用户场景下所有请求共用一个看板；过滤输入经过防抖后才生效

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::dashboard::Dashboard;
use super::debounce::Debouncer;
use crate::models::{Column, DashboardState, DashboardView, SortKey, ViewMode};

pub struct DashboardSession {
    dashboard: Arc<Mutex<Dashboard>>,
    debouncer: Debouncer,
}

impl DashboardSession {
    pub fn new(dashboard: Dashboard, debounce: Duration) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debouncer.delay()
    }

    pub async fn view(&self) -> DashboardView {
        self.dashboard.lock().await.view()
    }

    #[cfg(test)]
    pub async fn state(&self) -> DashboardState {
        self.dashboard.lock().await.state().clone()
    }

    /// 输入过滤关键字：立即记录输入内容，防抖结束后才应用
    ///
    /// 持锁期间完成调度，保证最后记录的输入也是最后被调度的任务
    pub async fn input(&self, query: String) -> DashboardState {
        let mut dashboard = self.dashboard.lock().await;
        dashboard.set_draft(&query);
        let state = dashboard.state().clone();

        let shared = self.dashboard.clone();
        self.debouncer.schedule(async move {
            shared.lock().await.set_query(&query);
        });
        state
    }

    pub async fn activate_sort(&self, column: Column) -> Option<SortKey> {
        self.dashboard.lock().await.activate_sort(column)
    }

    pub async fn clear_sort(&self) {
        self.dashboard.lock().await.set_sort(None);
    }

    pub async fn set_mode(&self, mode: ViewMode) {
        self.dashboard.lock().await.set_mode(mode);
    }

    pub async fn toggle_mode(&self) -> ViewMode {
        self.dashboard.lock().await.toggle_mode()
    }
}
