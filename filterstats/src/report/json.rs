//! 统计结果的 JSON 读写

use std::path::Path;

use filterstats_engine::Statistics;
use serde_json::Value;

use super::ensure_parent_dir;
use crate::error::{FilterStatsError, StatsResult};

const INVALID_FORMAT: &str = "Invalid statistics format. Expected { generatedAt, groups[] }";

/// 以带缩进的 JSON 写出统计结果
pub fn write_json(stats: &Statistics, path: impl AsRef<Path>) -> StatsResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, json)?;
    log::debug!("JSON 统计已写入：{}", path.display());
    Ok(())
}

/// 读取统计 JSON 文件
pub fn read_json(path: impl AsRef<Path>) -> StatsResult<Statistics> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FilterStatsError::ReportError(format!("Input file not found: {}", path.display()))
        } else {
            FilterStatsError::IoError(e)
        }
    })?;
    parse_json(&content)
}

/// 解析统计 JSON 文本，先校验顶层结构再反序列化
pub fn parse_json(content: &str) -> StatsResult<Statistics> {
    let value: Value = serde_json::from_str(content)
        .map_err(|_| FilterStatsError::ReportError("Invalid JSON format".to_string()))?;

    let has_timestamp = value
        .get("generatedAt")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    let has_groups = value.get("groups").is_some_and(Value::is_array);
    if !has_timestamp || !has_groups {
        return Err(FilterStatsError::ReportError(INVALID_FORMAT.to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| FilterStatsError::ReportError(format!("Invalid group statistics: {}", e)))
}
