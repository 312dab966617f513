//! 表头映射
//!
//! 表格表头（"P/E (Price earnings)"）和静态站点导出的字段名（"p_e__priceEarnings_"）
//! 归一化后都映射到同一个字段

use anyhow::{anyhow, Result};
use std::collections::HashSet;

use crate::models::StockRecord;

/// 记录字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Symbol,
    Url,
    Today,
    Drop,
    Buy,
    TakeProfit,
    Potential,
    Pe,
    Trend,
    Strategy,
    Group,
    Chart,
    /// 作者标记列，值为作者在配置中的序号
    Author(usize),
}

/// 归一化表头：小写，只保留字母和数字
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn field_for(normalized: &str, authors: &[String]) -> Option<Field> {
    let field = match normalized {
        "stock" | "symbol" | "ticker" => Field::Symbol,
        "url" | "link" => Field::Url,
        "today" | "currentprice" | "price" => Field::Today,
        "drop" | "droptobuy" => Field::Drop,
        "buy" | "buyprice" => Field::Buy,
        "tptakeprofit" | "takeprofit" | "tp" => Field::TakeProfit,
        "potential" => Field::Potential,
        "pepriceearnings" | "priceearnings" | "pe" | "per" => Field::Pe,
        "trend" => Field::Trend,
        "strategy" => Field::Strategy,
        "group" => Field::Group,
        "chart" => Field::Chart,
        other => {
            let index = authors
                .iter()
                .position(|author| normalize_header(author) == other)?;
            Field::Author(index)
        }
    };
    Some(field)
}

/// 作者标记是否有效：非空，且不是明确的否定值
fn is_flagged(cell: &str) -> bool {
    !matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "no" | "0"
    )
}

/// 表头到字段的映射
#[derive(Debug)]
pub struct HeaderMap {
    fields: Vec<Option<Field>>,
    authors: Vec<String>,
}

impl HeaderMap {
    pub fn new(headers: &[String], authors: &[String]) -> Result<Self> {
        let fields: Vec<Option<Field>> = headers
            .iter()
            .map(|h| field_for(&normalize_header(h), authors))
            .collect();

        if fields.iter().all(Option::is_none) {
            return Err(anyhow!("无法识别表头: {:?}", headers));
        }

        for (header, field) in headers.iter().zip(&fields) {
            if field.is_none() && !header.trim().is_empty() {
                log::debug!("忽略未知列: {}", header);
            }
        }

        Ok(Self {
            fields,
            authors: authors.to_vec(),
        })
    }

    /// 把一行单元格转换为记录
    pub fn record(&self, cells: &[String]) -> StockRecord {
        let mut record = StockRecord::default();
        let mut flagged = vec![false; self.authors.len()];

        for (field, cell) in self.fields.iter().zip(cells) {
            let Some(field) = field else {
                continue;
            };
            let value = cell.trim();
            if let Field::Author(index) = field {
                flagged[*index] |= is_flagged(value);
                continue;
            }
            if value.is_empty() {
                continue;
            }

            let slot = match field {
                Field::Symbol => &mut record.symbol,
                Field::Url => &mut record.url,
                Field::Today => &mut record.today,
                Field::Drop => &mut record.drop,
                Field::Buy => &mut record.buy,
                Field::TakeProfit => &mut record.take_profit,
                Field::Potential => &mut record.potential,
                Field::Pe => &mut record.pe,
                Field::Trend => &mut record.trend,
                Field::Strategy => &mut record.strategy,
                Field::Group => &mut record.group,
                Field::Chart => &mut record.chart,
                Field::Author(_) => continue,
            };
            *slot = Some(value.to_string());
        }

        record.authors = self
            .authors
            .iter()
            .zip(flagged)
            .filter(|(_, flagged)| *flagged)
            .map(|(author, _)| author.clone())
            .collect();
        record
    }
}

/// 第一行为表头，其余为数据行；跳过完全空白的行
pub fn rows_to_records(rows: Vec<Vec<String>>, authors: &[String]) -> Result<Vec<StockRecord>> {
    let mut rows = rows.into_iter();
    let headers = rows.next().ok_or_else(|| anyhow!("数据为空，缺少表头"))?;
    let header_map = HeaderMap::new(&headers, authors)?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = 0usize;

    for row in rows {
        let record = header_map.record(&row);
        if record.is_blank() {
            skipped += 1;
            continue;
        }
        if let Some(symbol) = &record.symbol {
            if !seen.insert(symbol.clone()) {
                log::debug!("股票代码重复: {}", symbol);
            }
        }
        records.push(record);
    }

    if skipped > 0 {
        log::debug!("跳过 {} 个空行", skipped);
    }
    Ok(records)
}
