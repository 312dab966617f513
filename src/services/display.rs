//! 展示属性计算
//!
//! 根据展示配置为记录派生分组颜色、市盈率着色、潜在涨幅着色和策略符号。
//! 缺失或无法解析的值退化为中性显示，不会报错。

use std::collections::BTreeMap;
use url::Url;

use super::numeric::parse_leading_number;
use crate::config::{DisplayConfig, PeRule, PotentialThresholds};
use crate::models::{DisplayAttrs, GroupLegend, StockRecord, Tone};

/// 市盈率缺失时的显示文字
pub const NOT_AVAILABLE: &str = "N/A";
/// 悲观策略
pub const PESSIMISTIC_GLYPH: &str = "👎";
/// 其他策略
pub const OPTIMISTIC_GLYPH: &str = "👍";

/// 分组颜色，按大写分组名查找，未知分组使用默认颜色
pub fn group_color<'a>(config: &'a DisplayConfig, group: Option<&str>) -> &'a str {
    group
        .map(|g| g.trim().to_uppercase())
        .and_then(|g| config.group_colors.get(&g))
        .unwrap_or(&config.default_group_color)
}

/// 市盈率着色
pub fn pe_tone(rule: &PeRule, pe: Option<&str>, trend: Option<&str>) -> Tone {
    let Some(pe) = pe.map(str::trim).filter(|p| !p.is_empty()) else {
        return Tone::Neutral;
    };
    if pe.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return Tone::Neutral;
    }

    match rule {
        PeRule::Threshold {
            cheap_below,
            expensive_above,
        } => match parse_leading_number(pe) {
            Some(value) if value < *cheap_below => Tone::Positive,
            Some(value) if value > *expensive_above => Tone::Negative,
            _ => Tone::Neutral,
        },
        PeRule::Trend { bullish_marker } => {
            if trend.is_some_and(|t| t.contains(bullish_marker.as_str())) {
                Tone::Positive
            } else {
                Tone::Negative
            }
        }
    }
}

/// 潜在涨幅着色
pub fn potential_tone(thresholds: &PotentialThresholds, potential: Option<&str>) -> Tone {
    match potential.and_then(parse_leading_number) {
        Some(value) if value > thresholds.high_above => Tone::Positive,
        Some(value) if value < thresholds.low_below => Tone::Negative,
        _ => Tone::Neutral,
    }
}

/// 只接受绝对链接
fn valid_link(url: Option<&str>) -> Option<String> {
    let raw = url?.trim();
    match Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(parsed.to_string()),
        Ok(_) | Err(_) => {
            log::debug!("忽略无效链接: {}", raw);
            None
        }
    }
}

/// 计算单条记录的展示属性
pub fn display_attrs(config: &DisplayConfig, record: &StockRecord) -> DisplayAttrs {
    let pe_tone = pe_tone(&config.pe_rule, record.pe.as_deref(), record.trend.as_deref());
    let potential_tone = potential_tone(&config.potential, record.potential.as_deref());
    let pessimistic = record
        .strategy
        .as_deref()
        .is_some_and(|s| s.contains(config.pessimistic_marker.as_str()));

    DisplayAttrs {
        group_label: record.group.as_deref().unwrap_or("").trim().to_uppercase(),
        group_color: group_color(config, record.group.as_deref()).to_string(),
        link: valid_link(record.url.as_deref()),
        pe_text: record
            .pe
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        pe_tone,
        pe_color: pe_tone.color(),
        potential_tone,
        potential_color: potential_tone.color(),
        pessimistic,
        strategy_glyph: if pessimistic {
            PESSIMISTIC_GLYPH
        } else {
            OPTIMISTIC_GLYPH
        },
        authors: record.authors.join(", "),
    }
}

/// 分组图例：按分组名排序，附带颜色和记录数
pub fn group_legend(config: &DisplayConfig, records: &[StockRecord]) -> Vec<GroupLegend> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let label = record.group.as_deref().unwrap_or("").trim().to_uppercase();
        *counts.entry(label).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(label, count)| GroupLegend {
            color: group_color(config, Some(label.as_str())).to_string(),
            label,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold() -> PeRule {
        PeRule::Threshold {
            cheap_below: 15.0,
            expensive_above: 30.0,
        }
    }

    fn trend_rule() -> PeRule {
        PeRule::Trend {
            bullish_marker: "Bull".to_string(),
        }
    }

    #[test]
    fn test_group_color_lookup() {
        let config = DisplayConfig::default();
        assert_eq!(group_color(&config, Some("TECH")), "green");
        assert_eq!(group_color(&config, Some("crypto")), "blue");
        assert_eq!(group_color(&config, Some("MINING")), "grey");
        assert_eq!(group_color(&config, None), "grey");
    }

    #[test]
    fn test_group_color_from_lowercase_config() {
        let config: DisplayConfig =
            serde_json::from_str(r#"{ "group_colors": { "tech": "purple" } }"#).unwrap();
        assert_eq!(group_color(&config, Some("Tech")), "purple");
        assert_eq!(group_color(&config, Some("GOODS")), "grey");
    }

    #[test]
    fn test_pe_threshold_rule() {
        let rule = threshold();
        assert_eq!(pe_tone(&rule, Some("12"), None), Tone::Positive);
        assert_eq!(pe_tone(&rule, Some("35"), None), Tone::Negative);
        assert_eq!(pe_tone(&rule, Some("15"), None), Tone::Neutral);
        assert_eq!(pe_tone(&rule, Some("30"), None), Tone::Neutral);
        assert_eq!(pe_tone(&rule, Some("-"), None), Tone::Neutral);
        assert_eq!(pe_tone(&rule, None, None), Tone::Neutral);
    }

    #[test]
    fn test_pe_trend_rule() {
        let rule = trend_rule();
        assert_eq!(pe_tone(&rule, Some("35"), Some("Bullish")), Tone::Positive);
        assert_eq!(pe_tone(&rule, Some("12"), Some("Bearish")), Tone::Negative);
        assert_eq!(pe_tone(&rule, Some("12"), None), Tone::Negative);
    }

    #[test]
    fn test_not_available_is_always_neutral() {
        for rule in [threshold(), trend_rule()] {
            assert_eq!(pe_tone(&rule, Some("N/A"), Some("Bull")), Tone::Neutral);
            assert_eq!(pe_tone(&rule, Some("n/a"), Some("Bear")), Tone::Neutral);
        }
    }

    #[test]
    fn test_potential_tone() {
        let thresholds = PotentialThresholds::default();
        assert_eq!(potential_tone(&thresholds, Some("45%")), Tone::Positive);
        assert_eq!(potential_tone(&thresholds, Some("10%")), Tone::Negative);
        assert_eq!(potential_tone(&thresholds, Some("30%")), Tone::Neutral);
        assert_eq!(potential_tone(&thresholds, Some("?")), Tone::Neutral);
    }

    #[test]
    fn test_display_attrs() {
        let config = DisplayConfig::default();
        let record = StockRecord {
            symbol: Some("TSLA".to_string()),
            url: Some("https://finance.yahoo.com/quote/TSLA".to_string()),
            pe: Some("12".to_string()),
            group: Some("tech".to_string()),
            strategy: Some("Pessimistic long".to_string()),
            authors: vec!["fs".to_string(), "as".to_string()],
            ..Default::default()
        };

        let attrs = display_attrs(&config, &record);
        assert_eq!(attrs.group_label, "TECH");
        assert_eq!(attrs.group_color, "green");
        assert_eq!(attrs.link.as_deref(), Some("https://finance.yahoo.com/quote/TSLA"));
        assert_eq!(attrs.pe_text, "12");
        assert_eq!(attrs.pe_color, "green");
        assert!(attrs.pessimistic);
        assert_eq!(attrs.strategy_glyph, PESSIMISTIC_GLYPH);
        assert_eq!(attrs.authors, "fs, as");
    }

    #[test]
    fn test_display_attrs_degrade_gracefully() {
        let config = DisplayConfig::default();
        let record = StockRecord {
            url: Some("not a url".to_string()),
            ..Default::default()
        };

        let attrs = display_attrs(&config, &record);
        assert_eq!(attrs.group_label, "");
        assert_eq!(attrs.group_color, "grey");
        assert_eq!(attrs.link, None);
        assert_eq!(attrs.pe_text, NOT_AVAILABLE);
        assert_eq!(attrs.pe_tone, Tone::Neutral);
        assert!(!attrs.pessimistic);
        assert_eq!(attrs.strategy_glyph, OPTIMISTIC_GLYPH);
    }

    #[test]
    fn test_group_legend() {
        let config = DisplayConfig::default();
        let records: Vec<StockRecord> = ["TECH", "tech", "CRYPTO", "MINING"]
            .iter()
            .map(|g| StockRecord {
                group: Some(g.to_string()),
                ..Default::default()
            })
            .collect();

        let legend = group_legend(&config, &records);
        let summary: Vec<(&str, &str, usize)> = legend
            .iter()
            .map(|g| (g.label.as_str(), g.color.as_str(), g.count))
            .collect();
        assert_eq!(
            summary,
            vec![("CRYPTO", "blue", 1), ("MINING", "grey", 1), ("TECH", "green", 2)]
        );
    }
}
