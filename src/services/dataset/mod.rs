//! 数据集加载
//!
//! 启动时从表格导出加载全部股票记录，之后只读
//!
//! ## 支持的数据源
//! - 本地文件：xlsx / xls / ods（calamine）、csv、json
//! - 远程地址：表格的发布/导出链接

mod columns;
mod delimited;
mod json;
mod remote;
mod workbook;

use anyhow::{anyhow, Result};
use chrono::Utc;
use chrono_tz::Tz;
use std::path::Path;
use std::sync::Arc;
use url::Url;

use crate::config::{DataConfig, DataFormat};
use crate::models::{DatasetInfo, StockRecord};

/// 已加载的数据集
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Arc<[StockRecord]>,
    pub info: DatasetInfo,
}

impl Dataset {
    pub fn new(records: Vec<StockRecord>, source: &str, timezone: Tz) -> Self {
        let info = DatasetInfo {
            source: source.to_string(),
            records: records.len(),
            loaded_at: Utc::now().with_timezone(&timezone).to_rfc3339(),
        };
        Self {
            records: records.into(),
            info,
        }
    }
}

/// 解析数据文件内容
pub fn parse_bytes(
    bytes: &[u8],
    format: DataFormat,
    config: &DataConfig,
    authors: &[String],
) -> Result<Vec<StockRecord>> {
    let rows = match format {
        DataFormat::Workbook => workbook::read_rows(bytes, config.sheet.as_deref())?,
        DataFormat::Csv => {
            let text = delimited::decode(bytes, config.encoding.as_deref())?;
            delimited::read_rows(&text)?
        }
        DataFormat::Json => {
            let text = delimited::decode(bytes, config.encoding.as_deref())?;
            json::read_rows(&text)?
        }
    };
    columns::rows_to_records(rows, authors)
}

fn format_for_path(path: &Path, config: &DataConfig) -> Result<DataFormat> {
    if let Some(format) = config.format {
        return Ok(format);
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(remote::format_from_extension)
        .ok_or_else(|| anyhow!("无法根据扩展名识别数据格式: {}", path.display()))
}

/// 远程数据格式：配置优先，其次从 URL 推断，默认 CSV
fn format_for_url(url: &Url, config: &DataConfig) -> DataFormat {
    config
        .format
        .or_else(|| remote::format_from_url(url))
        .unwrap_or(DataFormat::Csv)
}

/// 按配置加载数据集：优先本地文件，其次远程地址
pub async fn load(config: &DataConfig, authors: &[String], timezone: Tz) -> Result<Dataset> {
    if let Some(path) = &config.path {
        let path = Path::new(path);
        let format = format_for_path(path, config)?;
        log::info!("从文件加载数据: {} ({:?})", path.display(), format);

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow!("读取数据文件 {} 失败: {}", path.display(), e))?;
        let records = parse_bytes(&bytes, format, config, authors)?;
        return Ok(Dataset::new(records, &path.display().to_string(), timezone));
    }

    if let Some(raw) = &config.url {
        let url = Url::parse(raw).map_err(|e| anyhow!("数据源 URL 无效 {}: {}", raw, e))?;
        let format = format_for_url(&url, config);

        let bytes = remote::fetch(&url).await?;
        let records = parse_bytes(&bytes, format, config, authors)?;
        return Ok(Dataset::new(records, url.as_str(), timezone));
    }

    Err(anyhow!(
        "未配置数据源，请设置 data.path / data.url 或环境变量 STONKS_DATA_PATH / STONKS_DATA_URL"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors() -> Vec<String> {
        ["fs", "pm", "nr", "as"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_csv_bytes() {
        let bytes = "\u{feff}Stock,Today,P/E (Price earnings),Trend,Group,Strategy,FS\n\
                     TSLA,420,12,Bull,TECH,,x\n\
                     AMD,150,35,Bear,TECH,Pessimistic,\n\
                     ,,,,,,\n\
                     KO,60,N/A,Bull,GOODS,,\n";

        let records =
            parse_bytes(bytes.as_bytes(), DataFormat::Csv, &DataConfig::default(), &authors())
                .unwrap();

        let symbols: Vec<&str> = records.iter().filter_map(|r| r.symbol.as_deref()).collect();
        assert_eq!(symbols, vec!["TSLA", "AMD", "KO"]);
        assert_eq!(records[0].authors, vec!["fs"]);
        assert_eq!(records[1].strategy.as_deref(), Some("Pessimistic"));
        assert_eq!(records[2].pe.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_parse_json_bytes() {
        let bytes = br#"{"nodes": [
            {"stock": "BTC", "group": "CRYPTO", "potential": 80, "pm": "x"},
            {"stock": "SAN", "group": "SPAIN", "potential": "15%"}
        ]}"#;

        let records =
            parse_bytes(bytes, DataFormat::Json, &DataConfig::default(), &authors()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].potential.as_deref(), Some("80"));
        assert_eq!(records[0].authors, vec!["pm"]);
        assert_eq!(records[1].group.as_deref(), Some("SPAIN"));
    }

    #[test]
    fn test_format_for_path() {
        let config = DataConfig::default();
        assert_eq!(
            format_for_path(Path::new("data/stonks.XLSX"), &config).unwrap(),
            DataFormat::Workbook
        );
        assert_eq!(
            format_for_path(Path::new("stonks.csv"), &config).unwrap(),
            DataFormat::Csv
        );
        assert!(format_for_path(Path::new("stonks"), &config).is_err());

        let forced = DataConfig {
            format: Some(DataFormat::Json),
            ..Default::default()
        };
        assert_eq!(
            format_for_path(Path::new("stonks"), &forced).unwrap(),
            DataFormat::Json
        );
    }

    #[test]
    fn test_format_for_url() {
        let config = DataConfig::default();
        let url = |raw: &str| Url::parse(raw).unwrap();

        assert_eq!(
            format_for_url(&url("https://example.com/sheet/pub?output=xlsx"), &config),
            DataFormat::Workbook
        );
        assert_eq!(
            format_for_url(&url("https://example.com/export/stonks.json"), &config),
            DataFormat::Json
        );
        // 无法推断时按 CSV 处理
        assert_eq!(
            format_for_url(&url("https://example.com/sheet/pub?gid=0"), &config),
            DataFormat::Csv
        );

        let forced = DataConfig {
            format: Some(DataFormat::Json),
            ..Default::default()
        };
        assert_eq!(
            format_for_url(&url("https://example.com/stonks.csv"), &forced),
            DataFormat::Json
        );
    }

    #[tokio::test]
    async fn test_load_workbook_sheets() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/stonks.xlsx").to_string();
        let config = DataConfig {
            path: Some(path.clone()),
            ..Default::default()
        };

        let dataset = load(&config, &authors(), Tz::UTC).await.unwrap();
        let symbols: Vec<&str> = dataset.records.iter().filter_map(|r| r.symbol.as_deref()).collect();
        assert_eq!(symbols, vec!["TSLA", "KO"]);
        assert_eq!(dataset.records[0].today.as_deref(), Some("420"));
        assert_eq!(dataset.records[0].pe.as_deref(), Some("12"));
        assert_eq!(dataset.records[0].authors, vec!["fs"]);
        assert_eq!(dataset.records[1].pe.as_deref(), Some("N/A"));
        assert!(dataset.records[1].authors.is_empty());

        let config = DataConfig {
            path: Some(path),
            sheet: Some("Watchlist".to_string()),
            ..Default::default()
        };
        let dataset = load(&config, &authors(), Tz::UTC).await.unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].symbol.as_deref(), Some("NKE"));
        assert_eq!(dataset.records[0].trend.as_deref(), Some("Bear"));
    }

    #[tokio::test]
    async fn test_load_sample_file() {
        let config = DataConfig {
            path: Some(concat!(env!("CARGO_MANIFEST_DIR"), "/data/stonks.csv").to_string()),
            ..Default::default()
        };

        let dataset = load(&config, &authors(), Tz::UTC).await.unwrap();
        assert!(dataset.info.records > 0);
        assert_eq!(dataset.info.records, dataset.records.len());
        assert!(dataset.info.loaded_at.ends_with("+00:00"));
    }

    #[tokio::test]
    async fn test_load_without_source() {
        let result = load(&DataConfig::default(), &authors(), Tz::UTC).await;
        assert!(result.is_err());
    }
}
