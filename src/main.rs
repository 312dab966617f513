//! Stonks 看板服务
//!
//! 股票筛选看板：全文过滤、按列排序、卡片/表格两种视图
//! 数据来源：表格导出（xlsx / ods / csv / json），本地文件或远程链接

mod config;   // 配置
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务
mod state;    // 共享状态

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::services::dataset;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, origin) = AppConfig::load()?;

    // RUST_LOG 优先于配置文件中的日志级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &origin {
        Some(path) => log::info!("使用配置文件: {}", path.display()),
        None => log::info!("未找到配置文件，使用默认配置"),
    }

    let dataset = dataset::load(&config.data, &config.display.authors, config.display.timezone).await?;
    log::info!(
        "已加载 {} 条记录（来源: {}，时间: {}）",
        dataset.info.records,
        dataset.info.source,
        dataset.info.loaded_at
    );

    let state = web::Data::new(AppState::new(dataset, &config)?);
    let bind_addr = config.bind_addr();
    log::info!("启动 Stonks 看板服务: http://{}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
