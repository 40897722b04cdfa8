//! 远程下载选项

use std::time::Duration;

/// 默认单次请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// 默认重试次数（不含第一次）
pub const DEFAULT_RETRIES: u8 = 3;
/// 退避基准间隔，第 n 次重试前等待 base * 2^n
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
/// 单个分组内同时进行的下载数
pub const DEFAULT_CONCURRENCY: usize = 5;
/// 请求头 User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("filter-rules-stats/", env!("CARGO_PKG_VERSION"));

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Never,     // 不重试
    Times(u8), // 固定次数重试（不含第一次）
}

impl RetryPolicy {
    /// 最大重试次数
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::Never => 0,
            RetryPolicy::Times(n) => *n as usize,
        }
    }
}

impl From<u8> for RetryPolicy {
    fn from(retries: u8) -> Self {
        if retries == 0 {
            RetryPolicy::Never
        } else {
            RetryPolicy::Times(retries)
        }
    }
}

/// 网络下载相关选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,           // HTTP 超时
    pub retry: RetryPolicy,          // 重试策略
    pub retry_base_delay: Duration,  // 指数退避基准
    pub concurrency: usize,          // 分组内并发上限
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::Times(DEFAULT_RETRIES),
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchOptions {
    pub fn builder() -> FetchOptionsBuilder {
        FetchOptionsBuilder::new()
    }

    /// 第 attempt 次失败后的等待时长（attempt 从 0 开始）
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.retry_base_delay.saturating_mul(factor)
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct FetchOptionsBuilder {
    options: FetchOptions,
}

impl FetchOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.options.retry = retry;
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.options.retry_base_delay = delay;
        self
    }

    /// 并发上限，至少为 1
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.options.concurrency = concurrency.max(1);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> FetchOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.retry, RetryPolicy::Times(3));
        assert_eq!(options.concurrency, 5);
        assert!(options.user_agent.starts_with("filter-rules-stats/"));
    }

    #[test]
    fn test_backoff_doubles() {
        let options = FetchOptions::default();
        assert_eq!(options.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(options.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(options.backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_builder_chain() {
        let options = FetchOptions::builder()
            .timeout(Duration::from_millis(500))
            .retry(RetryPolicy::Never)
            .retry_base_delay(Duration::from_millis(10))
            .concurrency(0)
            .user_agent("test-agent")
            .build();

        assert_eq!(options.timeout, Duration::from_millis(500));
        assert_eq!(options.retry.max_retries(), 0);
        assert_eq!(options.backoff_delay(3), Duration::from_millis(80));
        assert_eq!(options.concurrency, 1);
        assert_eq!(options.user_agent, "test-agent");
    }

    #[test]
    fn test_retry_policy_from_count() {
        assert_eq!(RetryPolicy::from(0), RetryPolicy::Never);
        assert_eq!(RetryPolicy::from(2).max_retries(), 2);
    }
}
