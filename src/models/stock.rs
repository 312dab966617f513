//! 股票数据模型
//!
//! 定义股票记录及其派生展示属性

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::Column;

/// 股票记录
///
/// 表格中的一行，所有字段都可能为空。以股票代码作为标识（不强制唯一）。
/// 加载后不可变，看板只会派生过滤、排序后的视图。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// 股票代码
    pub symbol: Option<String>,
    /// 详情链接
    pub url: Option<String>,
    /// 当前价格
    pub today: Option<String>,
    /// 跌到多少买入
    pub drop: Option<String>,
    /// 买入价
    pub buy: Option<String>,
    /// 止盈价
    pub take_profit: Option<String>,
    /// 潜在涨幅
    pub potential: Option<String>,
    /// 市盈率（可能为 "N/A"）
    pub pe: Option<String>,
    /// 趋势（如 "Bullish"、"Bearish"）
    pub trend: Option<String>,
    /// 策略（如 "Pessimistic"）
    pub strategy: Option<String>,
    /// 分组，仅用于着色
    pub group: Option<String>,
    /// 图表链接
    pub chart: Option<String>,
    /// 标记了该股票的作者缩写，按配置顺序
    #[serde(default)]
    pub authors: Vec<String>,
}

impl StockRecord {
    /// 取某一列的原始值
    pub fn value(&self, column: Column) -> Option<Cow<'_, str>> {
        let field = match column {
            Column::Stock => &self.symbol,
            Column::Today => &self.today,
            Column::Drop => &self.drop,
            Column::Buy => &self.buy,
            Column::TakeProfit => &self.take_profit,
            Column::Potential => &self.potential,
            Column::PriceEarnings => &self.pe,
            Column::Strategy => &self.strategy,
            Column::Trend => &self.trend,
            Column::Group => &self.group,
            Column::Url => &self.url,
            Column::Author => {
                if self.authors.is_empty() {
                    return None;
                }
                return Some(Cow::Owned(self.authors.join(", ")));
            }
        };
        field.as_deref().map(Cow::Borrowed)
    }

    /// 所有字段都为空
    pub fn is_blank(&self) -> bool {
        self.authors.is_empty()
            && self.chart.is_none()
            && Column::ALL
                .iter()
                .filter(|c| **c != Column::Author)
                .all(|c| self.value(*c).is_none())
    }
}

/// 着色倾向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// 利好（绿色）
    Positive,
    /// 利空（红色）
    Negative,
    /// 中性（灰色）
    Neutral,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Positive => "green",
            Tone::Negative => "red",
            Tone::Neutral => "grey",
        }
    }
}

/// 派生展示属性
///
/// 由展示配置和记录计算得到，卡片和表格两种视图共用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayAttrs {
    /// 大写的分组标签
    pub group_label: String,
    /// 分组颜色
    pub group_color: String,
    /// 合法的绝对链接
    pub link: Option<String>,
    /// 市盈率显示文字
    pub pe_text: String,
    pub pe_tone: Tone,
    pub pe_color: &'static str,
    pub potential_tone: Tone,
    pub potential_color: &'static str,
    /// 是否悲观策略
    pub pessimistic: bool,
    /// 策略符号
    pub strategy_glyph: &'static str,
    /// 作者缩写
    pub authors: String,
}

/// 视图中的一行：记录加展示属性
#[derive(Debug, Clone, Serialize)]
pub struct StockRow {
    #[serde(flatten)]
    pub record: StockRecord,
    pub display: DisplayAttrs,
}

/// 分组图例
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLegend {
    pub label: String,
    pub color: String,
    pub count: usize,
}

/// 数据集信息
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    /// 数据来源（文件路径或 URL）
    pub source: String,
    /// 记录数
    pub records: usize,
    /// 加载时间（按配置时区）
    pub loaded_at: String,
}
