//! 过滤器分组配置加载与校验
//! 先反序列化为通用 YAML 值，再逐项校验，保证错误信息能定位到具体的 groups[i].urls[j]

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_yaml::Value;
use url::Url;

use super::fetch::{FetchOptions, FetchOptionsBuilder, RetryPolicy};
use crate::error::{FilterStatsError, StatsResult};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// 一个过滤器分组：名称 + 规则源地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGroup {
    pub name: String,
    pub urls: Vec<String>,
}

/// 完整应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub groups: Vec<FilterGroup>,
    pub fetch: FetchOptions,
}

/// 可选的 `fetch:` 配置段
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FetchSection {
    timeout_secs: Option<u64>,
    retries: Option<u8>,
    concurrency: Option<usize>,
}

impl FetchSection {
    fn into_options(self) -> FetchOptions {
        let mut builder = FetchOptionsBuilder::new();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.retries {
            builder = builder.retry(RetryPolicy::from(retries));
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.concurrency(concurrency);
        }
        builder.build()
    }
}

fn config_error(msg: impl Into<String>) -> FilterStatsError {
    FilterStatsError::ConfigError(msg.into())
}

/// 从文件加载配置
pub fn load_config(path: impl AsRef<Path>) -> StatsResult<AppConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            config_error(format!("Configuration file not found: {}", path.display()))
        } else {
            config_error(format!("Failed to read configuration file: {}", e))
        }
    })?;

    let config = parse_config(&content)?;
    log::debug!(
        "配置加载完成：path={}, groups={}",
        path.display(),
        config.groups.len()
    );
    Ok(config)
}

/// 从 YAML 文本解析并校验配置
pub fn parse_config(content: &str) -> StatsResult<AppConfig> {
    let data: Value = serde_yaml::from_str(content)
        .map_err(|e| config_error(format!("Failed to parse YAML: {}", e)))?;

    let Value::Mapping(config) = data else {
        return Err(config_error("Configuration must be an object"));
    };

    let Some(Value::Sequence(raw_groups)) = config.get("groups") else {
        return Err(config_error("Configuration must have a \"groups\" array"));
    };
    if raw_groups.is_empty() {
        return Err(config_error("\"groups\" array must not be empty"));
    }

    let groups = raw_groups
        .iter()
        .enumerate()
        .map(|(index, group)| validate_group(group, index))
        .collect::<StatsResult<Vec<_>>>()?;

    let fetch = match config.get("fetch") {
        None | Some(Value::Null) => FetchOptions::default(),
        Some(section) => serde_yaml::from_value::<FetchSection>(section.clone())
            .map_err(|e| config_error(format!("Invalid \"fetch\" section: {}", e)))?
            .into_options(),
    };

    Ok(AppConfig { groups, fetch })
}

fn validate_group(group: &Value, index: usize) -> StatsResult<FilterGroup> {
    let Value::Mapping(group) = group else {
        return Err(config_error(format!("groups[{}] must be an object", index)));
    };

    let name = match group.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            return Err(config_error(format!(
                "groups[{}].name must be a non-empty string",
                index
            )))
        }
    };

    let raw_urls = match group.get("urls") {
        Some(Value::Sequence(urls)) if !urls.is_empty() => urls,
        _ => {
            return Err(config_error(format!(
                "groups[{}].urls must be a non-empty array",
                index
            )))
        }
    };

    let mut urls = Vec::with_capacity(raw_urls.len());
    for (i, url) in raw_urls.iter().enumerate() {
        let Value::String(url) = url else {
            return Err(config_error(format!(
                "groups[{}].urls[{}] must be a string",
                index, i
            )));
        };
        if !is_valid_http_url(url) {
            return Err(config_error(format!(
                "groups[{}].urls[{}] is not a valid HTTP/HTTPS URL: {}",
                index, i, url
            )));
        }
        urls.push(url.clone());
    }

    Ok(FilterGroup { name, urls })
}

/// 仅接受 http/https 协议的绝对地址
pub fn is_valid_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err_of(yaml: &str) -> String {
        match parse_config(yaml) {
            Err(FilterStatsError::ConfigError(msg)) => msg,
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_config_trims_names() {
        let config = parse_config(
            r#"
groups:
  - name: "  AdGuard Base  "
    urls:
      - https://filters.adtidy.org/extension/ublock/filters/2.txt
  - name: EasyList
    urls: [http://example.com/a.txt, https://example.com/b.txt]
"#,
        )
        .unwrap();

        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[0].name, "AdGuard Base");
        assert_eq!(config.groups[1].urls.len(), 2);
        assert_eq!(config.fetch, FetchOptions::default());
    }

    #[test]
    fn test_fetch_section() {
        let config = parse_config(
            r#"
groups:
  - name: A
    urls: [https://example.com/a.txt]
fetch:
  timeoutSecs: 5
  retries: 0
  concurrency: 2
"#,
        )
        .unwrap();

        assert_eq!(config.fetch.timeout, Duration::from_secs(5));
        assert_eq!(config.fetch.retry, RetryPolicy::Never);
        assert_eq!(config.fetch.concurrency, 2);

        let msg = err_of("groups:\n  - name: A\n    urls: [https://a.com/x]\nfetch:\n  bogus: 1\n");
        assert!(msg.starts_with("Invalid \"fetch\" section: "), "{}", msg);
    }

    #[test]
    fn test_structure_errors() {
        assert_eq!(err_of(""), "Configuration must be an object");
        assert_eq!(err_of("- a\n- b\n"), "Configuration must be an object");
        assert_eq!(err_of("name: x\n"), "Configuration must have a \"groups\" array");
        assert_eq!(err_of("groups: {}\n"), "Configuration must have a \"groups\" array");
        assert_eq!(err_of("groups: []\n"), "\"groups\" array must not be empty");
        assert!(err_of("groups: [\n").starts_with("Failed to parse YAML: "));
    }

    #[test]
    fn test_group_errors() {
        assert_eq!(err_of("groups:\n  - just a string\n"), "groups[0] must be an object");
        assert_eq!(
            err_of("groups:\n  - name: '   '\n    urls: [https://a.com]\n"),
            "groups[0].name must be a non-empty string"
        );
        assert_eq!(
            err_of("groups:\n  - name: 42\n    urls: [https://a.com]\n"),
            "groups[0].name must be a non-empty string"
        );
        assert_eq!(
            err_of("groups:\n  - name: A\n    urls: [https://a.com]\n  - name: B\n    urls: []\n"),
            "groups[1].urls must be a non-empty array"
        );
        assert_eq!(
            err_of("groups:\n  - name: A\n    urls: [https://a.com, 7]\n"),
            "groups[0].urls[1] must be a string"
        );
        assert_eq!(
            err_of("groups:\n  - name: A\n    urls: [ftp://a.com/list.txt]\n"),
            "groups[0].urls[0] is not a valid HTTP/HTTPS URL: ftp://a.com/list.txt"
        );
        assert_eq!(
            err_of("groups:\n  - name: A\n    urls: [not a url]\n"),
            "groups[0].urls[0] is not a valid HTTP/HTTPS URL: not a url"
        );
    }

    #[test]
    fn test_is_valid_http_url() {
        assert!(is_valid_http_url("https://example.com/list.txt"));
        assert!(is_valid_http_url("http://127.0.0.1:8080/x"));
        assert!(!is_valid_http_url("file:///etc/hosts"));
        assert!(!is_valid_http_url("example.com/list.txt"));
    }
}
