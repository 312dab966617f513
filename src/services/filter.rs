//! 全文过滤
//!
//! 关键字（不区分大小写）是任一搜索字段的子串时保留该记录

use crate::models::{Column, StockRecord};

/// 过滤条件
#[derive(Debug, Clone)]
pub struct Filter {
    needle: String,
    fields: Vec<Column>,
}

impl Filter {
    /// 关键字会去掉首尾空白，空关键字匹配所有记录
    pub fn new(query: &str, fields: &[Column]) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
            fields: fields.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &StockRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        self.fields.iter().any(|column| {
            record
                .value(*column)
                .map(|value| value.to_lowercase().contains(&self.needle))
                .unwrap_or(false)
        })
    }

    /// 按原顺序返回匹配的记录
    pub fn apply<'a>(&self, records: &'a [StockRecord]) -> Vec<&'a StockRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
