//! 命令行参数定义与日志初始化（两个可执行文件共用）

use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env, Target};

use crate::config::DEFAULT_CONFIG_PATH;

/// JSON 统计文件名
pub const STATS_FILE_NAME: &str = "stats.json";
/// HTML 报告文件名
pub const HTML_FILE_NAME: &str = "index.html";

/// Analyze ad-blocking filter lists and generate statistical reports
#[derive(Debug, Parser)]
#[command(name = "filter-rules-stats", version, about)]
pub struct StatsArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "./output")]
    pub output: PathBuf,

    /// Generate only JSON output
    #[arg(long, conflicts_with = "html_only")]
    pub json_only: bool,

    /// Generate only HTML output
    #[arg(long)]
    pub html_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl StatsArgs {
    pub fn write_json(&self) -> bool {
        !self.html_only
    }

    pub fn write_html(&self) -> bool {
        !self.json_only
    }

    pub fn json_path(&self) -> PathBuf {
        self.output.join(STATS_FILE_NAME)
    }

    pub fn html_path(&self) -> PathBuf {
        self.output.join(HTML_FILE_NAME)
    }
}

/// Build HTML report from a JSON statistics file
#[derive(Debug, Parser)]
#[command(name = "build-html", version, about)]
pub struct BuildHtmlArgs {
    /// Path to input JSON file
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to output HTML file
    #[arg(short, long, value_name = "PATH", default_value = HTML_FILE_NAME)]
    pub output: PathBuf,
}

/// 初始化日志：默认 info，verbose 时 debug；RUST_LOG 优先
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_args_defaults() {
        let args = StatsArgs::try_parse_from(["filter-rules-stats"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert_eq!(args.json_path(), PathBuf::from("./output").join("stats.json"));
        assert!(args.write_json() && args.write_html());
        assert!(!args.verbose);
    }

    #[test]
    fn test_stats_args_flags() {
        let args = StatsArgs::try_parse_from([
            "filter-rules-stats", "-c", "groups.yaml", "-o", "dist", "--json-only", "-v",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("groups.yaml"));
        assert_eq!(args.html_path(), PathBuf::from("dist/index.html"));
        assert!(args.write_json());
        assert!(!args.write_html());
        assert!(args.verbose);

        assert!(StatsArgs::try_parse_from(["filter-rules-stats", "--json-only", "--html-only"]).is_err());
    }

    #[test]
    fn test_build_html_args() {
        assert!(BuildHtmlArgs::try_parse_from(["build-html"]).is_err());
        let args = BuildHtmlArgs::try_parse_from(["build-html", "-i", "stats.json"]).unwrap();
        assert_eq!(args.input, PathBuf::from("stats.json"));
        assert_eq!(args.output, PathBuf::from("index.html"));
    }
}
