//! 基于本地 HTTP 服务的下载与流水线测试
#![cfg(feature = "remote-loader")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use filterstats::{
    read_json, write_html, write_json, AppConfig, FetchOptions, FilterGroup, GroupLoader,
    RetryPolicy, StatsPipeline,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const LIST_ONE: &str = "! Title: One\n||ads.example.com^$third-party\nexample.com##.banner\n";
const LIST_TWO: &str = "||ads.example.com^$third-party\n@@||cdn.example.com^\nexample.com##+js(set-constant, a, 1)\n";

/// 本地测试服务，返回基地址与 /flaky.txt 的命中次数
async fn spawn_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let flaky_hits = Arc::new(AtomicUsize::new(0));
    let hits = flaky_hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let hits = hits.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = match path.as_str() {
                    "/one.txt" => ("200 OK", LIST_ONE),
                    "/two.txt" => ("200 OK", LIST_TWO),
                    "/flaky.txt" => {
                        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                            ("500 Internal Server Error", "")
                        } else {
                            ("200 OK", "||flaky.example.com^\n")
                        }
                    }
                    "/slow.txt" => {
                        tokio::time::sleep(Duration::from_secs(3)).await;
                        ("200 OK", "||slow.example.com^\n")
                    }
                    _ => ("404 Not Found", ""),
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), flaky_hits)
}

/// 测试环境可能设置了代理变量，这里直连本地服务
fn loader(options: FetchOptions) -> GroupLoader {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    GroupLoader::with_client(client, options)
}

fn fast_options(retry: RetryPolicy) -> FetchOptions {
    FetchOptions::builder()
        .timeout(Duration::from_secs(5))
        .retry(retry)
        .retry_base_delay(Duration::from_millis(10))
        .concurrency(2)
        .build()
}

#[tokio::test]
async fn test_download_group_keeps_url_order() {
    let (base, _) = spawn_server().await;
    let urls = vec![
        format!("{}/two.txt", base),
        format!("{}/missing.txt", base),
        format!("{}/one.txt", base),
    ];

    let results = loader(fast_options(RetryPolicy::Never))
        .download_group(&urls)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    let order: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(order, urls.iter().map(String::as_str).collect::<Vec<_>>());

    assert_eq!(results[0].content.as_deref(), Some(LIST_TWO));
    assert!(!results[1].is_success());
    assert_eq!(results[1].error.as_deref(), Some("HTTP 404: Not Found"));
    assert_eq!(results[2].content.as_deref(), Some(LIST_ONE));
}

#[tokio::test]
async fn test_retry_recovers_from_server_error() {
    let (base, hits) = spawn_server().await;
    let url = format!("{}/flaky.txt", base);

    let result = loader(fast_options(RetryPolicy::Times(2)))
        .download_url(&url)
        .await;

    assert!(result.is_success(), "{:?}", result.error);
    assert_eq!(result.content.as_deref(), Some("||flaky.example.com^\n"));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_retry_reports_first_failure() {
    let (base, hits) = spawn_server().await;
    let url = format!("{}/flaky.txt", base);

    let result = loader(fast_options(RetryPolicy::Never))
        .download_url(&url)
        .await;

    assert_eq!(result.error.as_deref(), Some("HTTP 500: Internal Server Error"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let (base, _) = spawn_server().await;
    let options = FetchOptions::builder()
        .timeout(Duration::from_millis(200))
        .retry(RetryPolicy::Never)
        .build();

    let result = loader(options)
        .download_url(&format!("{}/slow.txt", base))
        .await;

    assert_eq!(result.error.as_deref(), Some("Request timed out"));
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let (base, _) = spawn_server().await;
    let config = AppConfig {
        groups: vec![
            FilterGroup {
                name: "Merged".to_string(),
                urls: vec![
                    format!("{}/one.txt", base),
                    format!("{}/two.txt", base),
                    format!("{}/gone.txt", base),
                ],
            },
            FilterGroup {
                name: "Offline".to_string(),
                urls: vec![format!("{}/gone.txt", base)],
            },
        ],
        fetch: fast_options(RetryPolicy::Never),
    };

    let pipeline = StatsPipeline::with_loader(loader(config.fetch.clone()));
    let stats = pipeline.run(&config).await;

    assert_eq!(stats.groups.len(), 2);

    let merged = &stats.groups[0];
    assert_eq!(merged.name, "Merged");
    // 两个列表共有的规则只计一次
    assert_eq!(merged.total_rules, 5);
    assert_eq!(merged.rule_types.comments, 1);
    assert_eq!(merged.rule_types.network.blocking, 1);
    assert_eq!(merged.rule_types.network.exception, 1);
    assert_eq!(merged.rule_types.cosmetic.element_hiding, 1);
    assert_eq!(merged.rule_types.scriptlet.rules, 1);
    assert_eq!(merged.modifiers.counts.get("third-party"), Some(&1));
    assert_eq!(merged.scriptlets.by_name.get("set-constant"), Some(&1));
    assert_eq!(merged.errors.len(), 1);
    assert!(merged.errors[0].starts_with("Failed to download "));
    assert!(merged.errors[0].ends_with("/gone.txt: HTTP 404: Not Found"));

    let offline = &stats.groups[1];
    assert_eq!(offline.total_rules, 0);
    assert_eq!(offline.rule_types.total(), 0);
    assert_eq!(offline.errors.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("out").join("stats.json");
    let html_path = dir.path().join("out").join("index.html");
    write_json(&stats, &json_path).unwrap();
    write_html(&stats, &html_path).unwrap();

    let loaded = read_json(&json_path).unwrap();
    assert_eq!(loaded, stats);
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("Merged"));
    assert!(html.contains("Offline"));
}
