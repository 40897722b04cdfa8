//! filterstats - 广告过滤列表规则统计工具
//! 下载过滤器分组 → 解析规则 → 分类统计 → 输出 JSON / HTML 报告

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;

#[cfg(feature = "cli")]
pub mod cli;

// 导出全局错误类型
pub use self::error::{FilterStatsError, StatsResult};

// 导出配置模块核心结构体与构建器
pub use crate::config::{
    load_config, AppConfig, FetchOptions, FetchOptionsBuilder, FilterGroup, RetryPolicy,
};

// 导出加载、流水线与报告接口
pub use crate::loader::{merge_and_deduplicate, DownloadResult, GroupLoader, RemoteRuleFetcher};
pub use crate::pipeline::StatsPipeline;
pub use crate::report::{generate_html, read_json, write_html, write_json};

// 内核类型直接转出，调用方无需再依赖 engine crate
pub use filterstats_engine::{GroupStatistics, Statistics};
