//! 统计流水线：下载 → 合并去重 → 解析 → 聚合
//! 分组按配置顺序依次处理，单个分组内的下载并发进行

use chrono::{SecondsFormat, Utc};
use filterstats_engine::{AdblockRuleParser, GroupAggregator, GroupStatistics, Statistics};

use crate::config::{AppConfig, FetchOptions, FilterGroup};
use crate::error::StatsResult;
use crate::loader::{merge_and_deduplicate, DownloadResult, GroupLoader};

/// 统计流水线
#[derive(Debug, Clone)]
pub struct StatsPipeline {
    loader: GroupLoader,
}

impl StatsPipeline {
    pub fn new(options: FetchOptions) -> StatsResult<Self> {
        Ok(Self {
            loader: GroupLoader::new(options)?,
        })
    }

    pub fn with_loader(loader: GroupLoader) -> Self {
        Self { loader }
    }

    /// 处理单个分组
    pub async fn process_group(&self, group: &FilterGroup) -> StatsResult<GroupStatistics> {
        log::info!("Processing group: {}", group.name);
        log::debug!("URLs: {}", group.urls.join(", "));

        log::info!("Downloading {} filter list(s)...", group.urls.len());
        let results = self.loader.download_group(&group.urls).await?;

        Ok(Self::analyze_downloads(group, results))
    }

    /// 下载结果 → 分组统计（不涉及网络）
    /// 下载失败记为 `Failed to download <url>: <error>`，排在解析错误之前
    pub fn analyze_downloads(group: &FilterGroup, results: Vec<DownloadResult>) -> GroupStatistics {
        let mut contents = Vec::with_capacity(results.len());
        let mut download_errors = Vec::new();

        for result in results {
            match result.content {
                Some(content) => {
                    log::debug!("Downloaded: {}", result.url);
                    contents.push(content);
                }
                None => {
                    let error = result.error.unwrap_or_default();
                    log::warn!("Failed to download {}: {}", result.url, error);
                    download_errors.push(format!("Failed to download {}: {}", result.url, error));
                }
            }
        }

        let aggregator = GroupAggregator;
        if contents.is_empty() {
            log::error!("No filter lists downloaded for group: {}", group.name);
            return aggregator.aggregate(&group.name, &group.urls, &[], download_errors);
        }

        log::info!("Merging and deduplicating rules...");
        let rules = merge_and_deduplicate(&contents);
        log::info!("Total unique rules: {}", rules.len());

        log::info!("Parsing rules...");
        let parsed = AdblockRuleParser::default().parse_rules(&rules);
        log::debug!("Parse errors: {}", parsed.errors.len());

        log::info!("Analyzing statistics...");
        let mut errors = download_errors;
        errors.extend(parsed.errors);
        let stats = aggregator.aggregate(&group.name, &group.urls, &parsed.rules, errors);

        log::info!("Completed group: {}", group.name);
        stats
    }

    /// 按配置顺序处理所有分组，失败的分组记录日志后跳过
    pub async fn run(&self, config: &AppConfig) -> Statistics {
        let mut groups = Vec::with_capacity(config.groups.len());
        for group in &config.groups {
            match self.process_group(group).await {
                Ok(stats) => groups.push(stats),
                Err(e) => log::error!("Failed to process group \"{}\": {}", group.name, e),
            }
        }

        Statistics {
            generated_at: timestamp_now(),
            groups,
        }
    }
}

/// 当前 UTC 时间，RFC 3339，毫秒精度（如 `2024-01-01T00:00:00.000Z`）
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> FilterGroup {
        FilterGroup {
            name: "Test".to_string(),
            urls: vec!["https://a.test/1.txt".to_string(), "https://a.test/2.txt".to_string()],
        }
    }

    #[test]
    fn test_all_downloads_failed_yields_empty_stats() {
        let results = vec![
            DownloadResult::failure("https://a.test/1.txt", "HTTP 404: Not Found"),
            DownloadResult::failure("https://a.test/2.txt", "Request timed out"),
        ];
        let stats = StatsPipeline::analyze_downloads(&group(), results);

        assert_eq!(stats.total_rules, 0);
        assert_eq!(stats.rule_types.total(), 0);
        assert_eq!(
            stats.errors,
            vec![
                "Failed to download https://a.test/1.txt: HTTP 404: Not Found".to_string(),
                "Failed to download https://a.test/2.txt: Request timed out".to_string(),
            ]
        );
        assert_eq!(stats.source_urls, group().urls);
    }

    #[test]
    fn test_download_errors_precede_parse_errors() {
        let results = vec![
            DownloadResult::success("https://a.test/1.txt", "||a.com^\nexample.com##\n||a.com^\n".to_string()),
            DownloadResult::failure("https://a.test/2.txt", "HTTP 500: Internal Server Error"),
        ];
        let stats = StatsPipeline::analyze_downloads(&group(), results);

        assert_eq!(stats.total_rules, 2);
        assert_eq!(stats.rule_types.network.blocking, 1);
        assert_eq!(stats.rule_types.invalid, 1);
        assert_eq!(stats.errors.len(), 2);
        assert!(stats.errors[0].starts_with("Failed to download https://a.test/2.txt"));
        assert_eq!(stats.errors[1], "Failed to parse \"example.com##\": Empty cosmetic rule body");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
