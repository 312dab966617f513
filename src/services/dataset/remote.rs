//! 远程表格导出下载

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::DataFormat;

/// 按扩展名推断格式
pub fn format_from_extension(ext: &str) -> Option<DataFormat> {
    match ext.to_ascii_lowercase().as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(DataFormat::Workbook),
        "csv" | "tsv" | "txt" => Some(DataFormat::Csv),
        "json" => Some(DataFormat::Json),
        _ => None,
    }
}

/// 从 URL 推断格式：先看 format/output 参数（表格导出链接），再看路径扩展名
pub fn format_from_url(url: &Url) -> Option<DataFormat> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "format" || key == "output")
        .and_then(|(_, value)| format_from_extension(&value));
    if from_query.is_some() {
        return from_query;
    }

    url.path_segments()
        .and_then(|segments| segments.last())
        .and_then(|last| last.rsplit_once('.'))
        .and_then(|(_, ext)| format_from_extension(ext))
}

/// 下载数据文件
pub async fn fetch(url: &Url) -> Result<Vec<u8>> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

    log::info!("📡 请求数据源 URL: {}", url);

    let response = client
        .get(url.clone())
        .header(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        )
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("获取数据源失败: {}", response.status()));
    }

    let bytes = response.bytes().await?;
    log::info!("📊 下载完成，共 {} 字节", bytes.len());
    Ok(bytes.to_vec())
}
