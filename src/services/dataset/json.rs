//! JSON 数据解析
//!
//! 支持三种形状：
//! - 对象数组 `[{"stock": "TSLA", ...}]`
//! - `{"nodes": [...]}`
//! - 查询结果 `{"data": {"allGoogleSpreadsheet...": {"nodes": [...]}}}`
//!
//! 先转换成表头加数据行，再复用表头映射

use anyhow::{anyhow, Result};
use serde_json::Value;

/// 深度优先查找第一个 nodes 数组
fn find_nodes(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => {
            if let Some(Value::Array(nodes)) = map.get("nodes") {
                return Some(nodes);
            }
            map.values()
                .filter(|v| v.is_object())
                .find_map(find_nodes)
        }
        _ => None,
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// 转换为文本行，第一行为所有对象键的并集
///
/// 后续对象中新出现的键追加在末尾；同一对象内的键顺序取决于 serde_json 的 Map（默认按键名排序）
pub fn read_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let value: Value = serde_json::from_str(text).map_err(|e| anyhow!("解析 JSON 失败: {}", e))?;
    let nodes = find_nodes(&value).ok_or_else(|| anyhow!("JSON 中未找到记录数组"))?;

    let mut headers: Vec<String> = Vec::new();
    for node in nodes {
        let object = node
            .as_object()
            .ok_or_else(|| anyhow!("记录必须是对象: {}", node))?;
        for key in object.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(nodes.len() + 1);
    for node in nodes {
        rows.push(headers.iter().map(|key| cell_text(node.get(key))).collect());
    }
    rows.insert(0, headers);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_order() {
        let text = r#"[{"stock": "TSLA"}, {"group": "TECH"}, {"stock": "AMD", "trend": "Bear"}]"#;
        let rows = read_rows(text).unwrap();
        assert_eq!(rows[0], vec!["stock", "group", "trend"]);
        assert_eq!(rows[1], vec!["TSLA", "", ""]);
        assert_eq!(rows[3], vec!["AMD", "", "Bear"]);
    }

    #[test]
    fn test_plain_array() {
        let text = r#"[
            {"stock": "TSLA", "p_e__priceEarnings_": 12, "fs": true},
            {"stock": "KO", "p_e__priceEarnings_": "N/A", "trend": null}
        ]"#;

        let rows = read_rows(text).unwrap();
        assert_eq!(rows.len(), 3);

        let headers = &rows[0];
        let pe = headers.iter().position(|h| h == "p_e__priceEarnings_").unwrap();
        let fs = headers.iter().position(|h| h == "fs").unwrap();
        let trend = headers.iter().position(|h| h == "trend").unwrap();

        assert_eq!(rows[1][pe], "12");
        assert_eq!(rows[1][fs], "true");
        assert_eq!(rows[2][pe], "N/A");
        assert_eq!(rows[2][fs], "");
        assert_eq!(rows[2][trend], "");
    }

    #[test]
    fn test_query_result_shape() {
        let text = r#"{
            "data": {
                "allGoogleSpreadsheetStonks2020Stonks": {
                    "nodes": [{"stock": "AMD", "group": "TECH"}]
                }
            }
        }"#;

        let rows = read_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 2);
        assert!(rows[1].contains(&"AMD".to_string()));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(read_rows(r#"{"count": 3}"#).is_err());
        assert!(read_rows(r#"[1, 2, 3]"#).is_err());
        assert!(read_rows("not json").is_err());
    }
}
