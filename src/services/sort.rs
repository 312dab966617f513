//! 排序
//!
//! 表头点击在 未排序 -> 升序 -> 降序 -> 未排序 之间循环，
//! 点击其他列会清除之前的排序。
//!
//! 数值列两边都能解析成数字时按数值比较；数字排在非数字（"N/A"、空值）之前，
//! 非数字之间按字符串比较。降序使用反向比较器，同为稳定排序，
//! 相等的记录在两个方向上都保持原有顺序。

use std::cmp::Ordering;

use super::numeric::parse_leading_number;
use crate::models::{Column, SortDirection, SortKey, StockRecord};

/// 点击某一列表头后的排序状态
pub fn cycle(current: Option<SortKey>, column: Column) -> Option<SortKey> {
    match current {
        Some(key) if key.column == column => match key.direction {
            SortDirection::Ascending => Some(SortKey::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortKey::ascending(column)),
    }
}

/// 按升序比较两条记录的某一列
pub fn compare(a: &StockRecord, b: &StockRecord, column: Column) -> Ordering {
    let left = a.value(column);
    let right = b.value(column);
    let left = left.as_deref().unwrap_or("");
    let right = right.as_deref().unwrap_or("");

    if column.is_numeric() {
        match (parse_leading_number(left), parse_leading_number(right)) {
            (Some(x), Some(y)) => return x.total_cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }
    }
    left.cmp(right)
}

/// 稳定排序，key 为 None 时保持原顺序
pub fn sort_records(records: &mut [&StockRecord], key: Option<SortKey>) {
    let Some(key) = key else {
        return;
    };
    match key.direction {
        SortDirection::Ascending => records.sort_by(|a, b| compare(a, b, key.column)),
        SortDirection::Descending => records.sort_by(|a, b| compare(b, a, key.column)),
    }
}
