//! 远程过滤列表拉取工具
//! 核心特性：
//! 1. 纯异步设计（基于tokio异步运行时）
//! 2. 可配置重试策略（Never/Times(n)），指数退避
//! 3. 单次请求超时，超时统一报告为 `Request timed out`
//! 4. 特性条件编译（remote-loader特性控制功能开关）

use crate::config::FetchOptions;
use crate::error::{FilterStatsError, StatsResult};
#[cfg(feature = "remote-loader")]
use reqwest::Client;

/// 远程规则拉取器
/// 无状态工具类，专注于过滤列表文本的拉取与重试逻辑
#[derive(Debug, Default)]
pub struct RemoteRuleFetcher;

impl RemoteRuleFetcher {
    /// 构建共享的 HTTP 客户端（开启 gzip，设置 User-Agent）
    #[cfg(feature = "remote-loader")]
    pub fn build_client(options: &FetchOptions) -> StatsResult<Client> {
        Client::builder()
            .user_agent(options.user_agent.as_str())
            .gzip(true)
            .build()
            .map_err(|e| FilterStatsError::NetworkError(format!("Failed to build HTTP client: {}", e)))
    }

    /// 通用异步重试逻辑
    /// 1. 最多执行 1 + max_retries 次
    /// 2. 第 n 次失败后等待 retry_base_delay * 2^n
    /// 3. 全部失败时返回最后一次错误
    #[cfg(feature = "remote-loader")]
    async fn simple_retry<F, Fut, T>(&self, options: &FetchOptions, mut func: F) -> StatsResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = StatsResult<T>>,
    {
        let max_retries = options.retry.max_retries();
        let mut last_err: Option<FilterStatsError> = None;

        for attempt in 0..=max_retries {
            match func().await {
                Ok(res) => return Ok(res),
                Err(e) => {
                    if attempt < max_retries {
                        let delay = options.backoff_delay(attempt);
                        log::warn!(
                            "Request failed: {}, retrying in {:?} (attempt {}/{})",
                            e,
                            delay,
                            attempt + 1,
                            max_retries
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            FilterStatsError::NetworkError("All retry attempts exhausted".to_string())
        }))
    }

    /// 拉取一个过滤列表的文本内容
    /// 非 2xx 状态码报告为 `HTTP <code>: <reason>`
    #[cfg(feature = "remote-loader")]
    pub async fn fetch_text(
        &self,
        client: &Client,
        url: &str,
        options: &FetchOptions,
    ) -> StatsResult<String> {
        let content = self
            .simple_retry(options, move || async move {
                let response = client
                    .get(url)
                    .header(reqwest::header::USER_AGENT, options.user_agent.as_str())
                    .timeout(options.timeout)
                    .send()
                    .await
                    .map_err(network_error)?;

                let status = response.status();
                if !status.is_success() {
                    return Err(http_status_error(status));
                }

                response.text().await.map_err(network_error)
            })
            .await?;

        log::debug!("Fetched [{}]: {} bytes", url, content.len());
        Ok(content)
    }

    /// 未启用remote-loader特性时的占位实现
    #[cfg(not(feature = "remote-loader"))]
    pub async fn fetch_text(
        &self,
        _client: &(),
        _url: &str,
        _options: &FetchOptions,
    ) -> StatsResult<String> {
        Err(FilterStatsError::NetworkError(
            "remote-loader feature is not enabled".to_string(),
        ))
    }
}

#[cfg(feature = "remote-loader")]
fn network_error(e: reqwest::Error) -> FilterStatsError {
    if e.is_timeout() {
        FilterStatsError::NetworkError("Request timed out".to_string())
    } else {
        FilterStatsError::NetworkError(e.to_string())
    }
}

/// 非 2xx 响应：`HTTP 404: Not Found`
#[cfg(feature = "remote-loader")]
fn http_status_error(status: reqwest::StatusCode) -> FilterStatsError {
    FilterStatsError::NetworkError(format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    ))
}

#[cfg(all(test, feature = "remote-loader"))]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_http_status_message() {
        assert_eq!(
            http_status_error(StatusCode::NOT_FOUND).to_string(),
            "HTTP 404: Not Found"
        );
        assert_eq!(
            http_status_error(StatusCode::SERVICE_UNAVAILABLE).to_string(),
            "HTTP 503: Service Unavailable"
        );
    }
}
