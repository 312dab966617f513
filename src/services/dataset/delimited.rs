//! CSV 解析
//!
//! 表格导出的 CSV 可能带 BOM 或使用旧编码，先解码再按行读取

use anyhow::{anyhow, Result};
use encoding_rs::{Encoding, UTF_8};

/// 解码文本：有 BOM 时以 BOM 为准，否则使用指定编码（默认 UTF-8）
pub fn decode(bytes: &[u8], label: Option<&str>) -> Result<String> {
    let encoding = match label {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| anyhow!("未知的文本编码: {}", label))?,
        None => UTF_8,
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        log::debug!("按 BOM 识别编码: {}", used.name());
    }
    if had_errors {
        log::warn!("CSV 中存在无法按 {} 解码的字节，已替换", used.name());
    }
    Ok(text.into_owned())
}

/// 读取所有行（包含表头），允许行长度不一致
pub fn read_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| anyhow!("解析 CSV 第 {} 行失败: {}", line + 1, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
