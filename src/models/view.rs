//! 看板视图模型
//!
//! 定义表格列、排序状态、视图模式以及接口请求参数

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StockRow;

/// 表格列
///
/// 记录的全部字段都有对应的列，表格只展示其中的可见列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Column {
    Stock,
    Today,
    Drop,
    Buy,
    TakeProfit,
    Potential,
    PriceEarnings,
    Strategy,
    Author,
    Trend,
    Group,
    Url,
}

impl Column {
    /// 全部列，按表格展示顺序排列
    pub const ALL: [Column; 12] = [
        Column::Stock,
        Column::Today,
        Column::Drop,
        Column::Buy,
        Column::TakeProfit,
        Column::Potential,
        Column::PriceEarnings,
        Column::Strategy,
        Column::Author,
        Column::Trend,
        Column::Group,
        Column::Url,
    ];

    /// 列标识（用于 URL 参数和 JSON）
    pub fn id(self) -> &'static str {
        match self {
            Column::Stock => "stock",
            Column::Today => "today",
            Column::Drop => "drop",
            Column::Buy => "buy",
            Column::TakeProfit => "take_profit",
            Column::Potential => "potential",
            Column::PriceEarnings => "pe",
            Column::Strategy => "strategy",
            Column::Author => "author",
            Column::Trend => "trend",
            Column::Group => "group",
            Column::Url => "url",
        }
    }

    /// 表头文字
    pub fn header(self) -> &'static str {
        match self {
            Column::Stock => "Stock",
            Column::Today => "Current price",
            Column::Drop => "Drop to buy",
            Column::Buy => "Buy",
            Column::TakeProfit => "Take profit",
            Column::Potential => "Potential",
            Column::PriceEarnings => "Price earnings",
            Column::Strategy => "Strategy",
            Column::Author => "Author",
            Column::Trend => "Trend",
            Column::Group => "Group",
            Column::Url => "URL",
        }
    }

    /// 是否按数值比较
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::Today
                | Column::Drop
                | Column::Buy
                | Column::TakeProfit
                | Column::Potential
                | Column::PriceEarnings
        )
    }
}

impl FromStr for Column {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let column = match s.trim().to_ascii_lowercase().as_str() {
            "stock" | "symbol" => Column::Stock,
            "today" | "price" | "current_price" => Column::Today,
            "drop" | "drop_to_buy" => Column::Drop,
            "buy" => Column::Buy,
            "take_profit" | "tp" => Column::TakeProfit,
            "potential" => Column::Potential,
            "pe" | "price_earnings" => Column::PriceEarnings,
            "strategy" => Column::Strategy,
            "author" | "authors" => Column::Author,
            "trend" => Column::Trend,
            "group" => Column::Group,
            "url" => Column::Url,
            other => return Err(anyhow!("未知的列: {}", other)),
        };
        Ok(column)
    }
}

impl TryFrom<String> for Column {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Column> for &'static str {
    fn from(column: Column) -> Self {
        column.id()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn id(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// 表头上的排序指示符
    pub fn glyph(self) -> &'static str {
        match self {
            SortDirection::Ascending => " 🔼",
            SortDirection::Descending => " 🔽",
        }
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(anyhow!("未知的排序方向: {}", other)),
        }
    }
}

/// 当前排序：某一列加方向，同一时刻只有一列参与排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// 视图模式：卡片或表格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Cards,
    #[default]
    #[serde(alias = "table")]
    List,
}

impl ViewMode {
    pub fn id(self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::List => "list",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::List,
            ViewMode::List => ViewMode::Cards,
        }
    }
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "card" => Ok(ViewMode::Cards),
            "list" | "table" => Ok(ViewMode::List),
            other => Err(anyhow!("未知的视图模式: {}", other)),
        }
    }
}

/// 看板交互状态
///
/// - draft: 输入框中的内容（尚未生效）
/// - query: 已生效的过滤条件
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardState {
    pub draft: String,
    pub query: String,
    pub sort: Option<SortKey>,
    pub mode: ViewMode,
}

/// 过滤、排序后的视图
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub state: DashboardState,
    /// 数据集总记录数
    pub total: usize,
    /// 过滤后的记录数
    pub matched: usize,
    pub rows: Vec<StockRow>,
}

/// 股票列表查询参数
///
/// GET /api/v1/stocks?q=bull&sort=pe&dir=asc&fields=stock,trend
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    /// 全文搜索关键字
    pub q: Option<String>,
    /// 排序列
    pub sort: Option<String>,
    /// 排序方向（asc/desc，默认 asc）
    pub dir: Option<String>,
    /// 逗号分隔的搜索字段，覆盖默认配置
    pub fields: Option<String>,
}

/// 看板页面参数
///
/// GET /?q=tech&sort=potential&dir=desc&view=cards
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub view: Option<String>,
}

/// 过滤输入
#[derive(Debug, Deserialize)]
pub struct FilterInput {
    #[serde(default)]
    pub query: String,
}

/// 视图模式切换
#[derive(Debug, Deserialize)]
pub struct ViewInput {
    pub mode: ViewMode,
}
