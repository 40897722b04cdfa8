//! 分组下载器：一个分组内的多个过滤列表并发下载
//! 并发度由 Semaphore 限流，结果顺序与输入地址顺序一致

use crate::config::FetchOptions;
use crate::error::{FilterStatsError, StatsResult};

#[cfg(feature = "remote-loader")]
use super::remote_fetcher::RemoteRuleFetcher;
#[cfg(feature = "remote-loader")]
use reqwest::Client;
#[cfg(feature = "remote-loader")]
use std::sync::Arc;
#[cfg(feature = "remote-loader")]
use tokio::sync::Semaphore;

/// 单个地址的下载结果：content 与 error 二者恰有其一
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub url: String,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl DownloadResult {
    pub fn success(url: impl Into<String>, content: String) -> Self {
        Self {
            url: url.into(),
            content: Some(content),
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
            error: Some(error.into()),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.content.is_some()
    }
}

/// 分组下载器
#[derive(Debug, Clone)]
pub struct GroupLoader {
    #[cfg(feature = "remote-loader")]
    client: Client,
    options: FetchOptions,
}

impl GroupLoader {
    #[cfg(feature = "remote-loader")]
    pub fn new(options: FetchOptions) -> StatsResult<Self> {
        let client = RemoteRuleFetcher::build_client(&options)?;
        Ok(Self { client, options })
    }

    /// 使用外部构建的客户端（如需自定义代理、证书）
    #[cfg(feature = "remote-loader")]
    pub fn with_client(client: Client, options: FetchOptions) -> Self {
        Self { client, options }
    }

    #[cfg(not(feature = "remote-loader"))]
    pub fn new(_options: FetchOptions) -> StatsResult<Self> {
        Err(FilterStatsError::NetworkError(
            "remote-loader feature is not enabled".to_string(),
        ))
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// 下载单个地址，失败不会返回错误，而是记录在结果中
    #[cfg(feature = "remote-loader")]
    pub async fn download_url(&self, url: &str) -> DownloadResult {
        download_one(&self.client, url, &self.options).await
    }

    /// 并发下载分组内所有地址
    #[cfg(feature = "remote-loader")]
    pub async fn download_group(&self, urls: &[String]) -> StatsResult<Vec<DownloadResult>> {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut handles = Vec::with_capacity(urls.len());

        for url in urls {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| FilterStatsError::AsyncTaskError(e.to_string()))?;
            let client = self.client.clone();
            let options = self.options.clone();
            let url = url.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                download_one(&client, &url, &options).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .map_err(|e| FilterStatsError::AsyncTaskError(e.to_string()))?;
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        log::debug!(
            "分组下载完成：total={}, failed={}, concurrency={}",
            results.len(),
            failed,
            self.options.concurrency
        );
        Ok(results)
    }

    #[cfg(not(feature = "remote-loader"))]
    pub async fn download_group(&self, _urls: &[String]) -> StatsResult<Vec<DownloadResult>> {
        Err(FilterStatsError::NetworkError(
            "remote-loader feature is not enabled".to_string(),
        ))
    }
}

#[cfg(feature = "remote-loader")]
async fn download_one(client: &Client, url: &str, options: &FetchOptions) -> DownloadResult {
    match RemoteRuleFetcher.fetch_text(client, url, options).await {
        Ok(content) => DownloadResult::success(url, content),
        Err(e) => DownloadResult::failure(url, e.to_string()),
    }
}
