//! filter-rules-stats：按配置下载过滤列表并输出统计报告

use std::process::ExitCode;

use clap::Parser;
use filterstats::cli::{init_logging, StatsArgs};
use filterstats::report::format_count;
use filterstats::{load_config, write_html, write_json, FilterStatsError, StatsPipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let args = StatsArgs::parse();
    init_logging(args.verbose);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &StatsArgs) -> Result<(), FilterStatsError> {
    log::info!("Filter Rules Statistics Tool v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Config: {}", args.config.display());
    log::debug!("Output: {}", args.output.display());

    let config = load_config(&args.config)?;
    log::info!("Loaded configuration with {} group(s)", config.groups.len());

    let pipeline = StatsPipeline::new(config.fetch.clone())?;
    let statistics = pipeline.run(&config).await;

    if args.write_json() {
        let path = args.json_path();
        log::info!("Writing JSON output to {}", path.display());
        write_json(&statistics, &path)?;
    }

    if args.write_html() {
        let path = args.html_path();
        log::info!("Writing HTML report to {}", path.display());
        write_html(&statistics, &path)?;
    }

    log::info!("Analysis complete!");
    log::info!("Total rules analyzed: {}", format_count(statistics.total_rules()));
    Ok(())
}
