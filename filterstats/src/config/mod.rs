//! 配置模块：过滤器分组配置文件 + 下载选项
pub mod fetch;
pub mod groups;

pub use fetch::{FetchOptions, FetchOptionsBuilder, RetryPolicy};
pub use groups::{load_config, parse_config, AppConfig, FilterGroup, DEFAULT_CONFIG_PATH};
