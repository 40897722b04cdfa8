//! build-html：从 JSON 统计文件重新渲染 HTML 报告

use std::process::ExitCode;

use clap::Parser;
use filterstats::cli::{init_logging, BuildHtmlArgs};
use filterstats::{read_json, write_html, StatsResult};

fn main() -> ExitCode {
    let args = BuildHtmlArgs::parse();
    init_logging(false);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &BuildHtmlArgs) -> StatsResult<()> {
    log::info!("Reading JSON from: {}", args.input.display());
    let stats = read_json(&args.input)?;
    log::info!("Found {} group(s) in statistics", stats.groups.len());

    write_html(&stats, &args.output)?;
    log::info!("HTML report written to: {}", args.output.display());
    Ok(())
}
