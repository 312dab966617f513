//! 数值解析
//!
//! 表格中的价格、涨幅、市盈率都是字符串（"12"、"45%"、"-10%"、"N/A"），
//! 以开头的数字作为数值，与宽松的整数解析行为一致

use regex::Regex;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?(?:\d+(?:\.\d*)?|\.\d+))").expect("leading number regex")
});

/// 解析字符串开头的数字，没有数字时返回 None
pub fn parse_leading_number(value: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(value)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
