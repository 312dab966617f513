//! Excel / ODS 工作簿解析

use anyhow::{anyhow, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// 单元格转文本
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => format!("{}", f),
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            log::debug!("单元格错误: {:?}", e);
            String::new()
        }
        Data::Empty => String::new(),
        #[allow(unreachable_patterns)]
        _ => String::new(),
    }
}

/// 读取工作簿中的一个工作表（默认第一个）为文本行
pub fn read_rows(bytes: &[u8], sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    let cursor = Cursor::new(bytes);
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| anyhow!("打开工作簿失败: {}", e))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| anyhow!("工作表 {} 不存在，可用: {:?}", name, sheet_names))?,
        None => sheet_names
            .first()
            .ok_or_else(|| anyhow!("工作簿没有工作表"))?,
    };
    log::debug!("读取工作表: {}", name);

    let range = workbook
        .worksheet_range(name)
        .map_err(|e| anyhow!("读取工作表 {} 失败: {}", name, e))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}
