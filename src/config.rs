//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，数据源可由环境变量覆盖

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Column, ViewMode};

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 数据文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// xlsx / xls / ods 工作簿
    Workbook,
    Csv,
    Json,
}

/// 数据源配置
///
/// path 与 url 二选一，同时配置时优先使用 path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// 本地文件路径
    #[serde(default)]
    pub path: Option<String>,
    /// 远程导出地址（如表格的 CSV 发布链接）
    #[serde(default)]
    pub url: Option<String>,
    /// 工作表名称（默认第一个）
    #[serde(default)]
    pub sheet: Option<String>,
    /// 强制指定格式，不指定时按扩展名推断
    #[serde(default)]
    pub format: Option<DataFormat>,
    /// CSV 文本编码标签（如 windows-1252），默认按 BOM 识别，否则 UTF-8
    #[serde(default)]
    pub encoding: Option<String>,
}

/// 市盈率着色规则
///
/// - threshold: 低于 cheap_below 为绿色，高于 expensive_above 为红色，其余灰色
/// - trend: 趋势包含 bullish_marker 为绿色，否则红色（旧版规则）
///
/// 两种规则下 "N/A" 都为灰色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PeRule {
    Threshold {
        #[serde(default = "default_cheap_below")]
        cheap_below: f64,
        #[serde(default = "default_expensive_above")]
        expensive_above: f64,
    },
    Trend {
        #[serde(default = "default_bullish_marker")]
        bullish_marker: String,
    },
}

impl Default for PeRule {
    fn default() -> Self {
        PeRule::Threshold {
            cheap_below: default_cheap_below(),
            expensive_above: default_expensive_above(),
        }
    }
}

/// 潜在涨幅着色阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialThresholds {
    /// 高于此值为绿色
    #[serde(default = "default_potential_high")]
    pub high_above: f64,
    /// 低于此值为红色
    #[serde(default = "default_potential_low")]
    pub low_below: f64,
}

impl Default for PotentialThresholds {
    fn default() -> Self {
        Self {
            high_above: default_potential_high(),
            low_below: default_potential_low(),
        }
    }
}

/// 展示配置
///
/// 分组颜色表、着色阈值等查找表，整体作为不可变配置传入看板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 分组 -> 颜色（分组按大写匹配）
    #[serde(
        default = "default_group_colors",
        deserialize_with = "deserialize_group_colors"
    )]
    pub group_colors: BTreeMap<String, String>,
    /// 未知分组使用的颜色
    #[serde(default = "default_group_color")]
    pub default_group_color: String,
    #[serde(default)]
    pub pe_rule: PeRule,
    #[serde(default)]
    pub potential: PotentialThresholds,
    /// 策略中包含该词时视为悲观
    #[serde(default = "default_pessimistic_marker")]
    pub pessimistic_marker: String,
    /// 作者标记列，按顺序
    #[serde(default = "default_authors")]
    pub authors: Vec<String>,
    /// 表格中隐藏的列（仍参与过滤和排序）
    #[serde(default = "default_hidden_columns")]
    pub hidden_columns: Vec<Column>,
    /// 默认视图模式
    #[serde(default)]
    pub default_view: ViewMode,
    /// 加载时间显示时区
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl DisplayConfig {
    /// 表格可见列
    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.hidden_columns.contains(c))
            .collect()
    }
}

/// 过滤配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// 参与全文搜索的字段
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<Column>,
    /// 为 true 时改为搜索所有可见列
    #[serde(default)]
    pub search_visible_columns: bool,
    /// 输入防抖时间（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 数据源配置
    #[serde(default)]
    pub data: DataConfig,
    /// 展示配置
    #[serde(default)]
    pub display: DisplayConfig,
    /// 过滤配置
    #[serde(default)]
    pub filter: FilterConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_log_level() -> String { "info".to_string() }
fn default_cheap_below() -> f64 { 15.0 }
fn default_expensive_above() -> f64 { 30.0 }
fn default_bullish_marker() -> String { "Bull".to_string() }
fn default_potential_high() -> f64 { 40.0 }
fn default_potential_low() -> f64 { 20.0 }
fn default_group_color() -> String { "grey".to_string() }
fn default_pessimistic_marker() -> String { "Pessimistic".to_string() }
fn default_timezone() -> Tz { Tz::UTC }
fn default_debounce_ms() -> u64 { 200 }

/// 分组名统一转为大写，与记录分组的查找方式一致
fn deserialize_group_colors<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let colors = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(colors
        .into_iter()
        .map(|(group, color)| (group.trim().to_uppercase(), color))
        .collect())
}

fn default_group_colors() -> BTreeMap<String, String> {
    [
        ("TECH", "green"),
        ("GOODS", "red"),
        ("CRYPTO", "blue"),
        ("SPAIN", "yellow"),
        ("AVIATION", "orange"),
        ("GERMANY", "black"),
    ]
    .into_iter()
    .map(|(group, color)| (group.to_string(), color.to_string()))
    .collect()
}

fn default_authors() -> Vec<String> {
    ["fs", "pm", "nr", "as"].iter().map(|s| s.to_string()).collect()
}

fn default_hidden_columns() -> Vec<Column> {
    vec![Column::Trend, Column::Group, Column::Url]
}

fn default_search_fields() -> Vec<Column> {
    vec![Column::Stock, Column::Trend, Column::Group, Column::Strategy]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            group_colors: default_group_colors(),
            default_group_color: default_group_color(),
            pe_rule: PeRule::default(),
            potential: PotentialThresholds::default(),
            pessimistic_marker: default_pessimistic_marker(),
            authors: default_authors(),
            hidden_columns: default_hidden_columns(),
            default_view: ViewMode::default(),
            timezone: default_timezone(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search_fields: default_search_fields(),
            search_visible_columns: false,
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// 默认配置文件位置
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("读取配置文件 {} 失败: {}", path.display(), e))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow!("解析配置文件 {} 失败: {}", path.display(), e))?;
        Ok(config)
    }

    /// 查找配置文件：优先 STONKS_CONFIG，其次默认位置
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var("STONKS_CONFIG") {
            return Some(PathBuf::from(path));
        }
        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// 加载配置：找到配置文件则解析（失败即报错），否则使用默认值；
    /// 之后应用环境变量覆盖
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let origin = Self::locate();
        let mut config = match &origin {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok((config, origin))
    }

    /// 环境变量覆盖数据源
    fn apply_env(&mut self) {
        if let Ok(path) = env::var("STONKS_DATA_PATH") {
            self.data.path = Some(path);
        }
        if let Ok(url) = env::var("STONKS_DATA_URL") {
            self.data.url = Some(url);
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
