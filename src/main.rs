mod cli;
mod logging;
mod reporter;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use colored::*;
use din_keeper::config::load_env_settings;
use din_keeper::utils::prompt::wait_for_enter;
use din_keeper::{Analyzer, AppConfig, RunReport, Tag, YearBounds};
use dotenv::dotenv;
use reporter::CliReporter;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();
    let embedded = args.embedded;

    let code = match run(args) {
        Ok(report) => {
            print_summary(&report);
            if report.warnings_found() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::from(2)
        }
    };

    if !embedded {
        if let Err(err) = wait_for_enter("\nPROCESS FINALIZED\n\t\tPRESS ENTER TO RESUME") {
            error!("Error reading stdin: {}", err);
        }
    }

    code
}

fn run(args: Cli) -> anyhow::Result<RunReport> {
    let settings = load_env_settings().context("Error loading configuration")?;
    let year_bounds = YearBounds::new(args.min_year, args.max_year)?;

    let mut config = AppConfig::new(args.root).with_env_settings(&settings);
    config.folder_patterns = args.patterns;
    config.year_bounds = year_bounds;

    let analyzer = Analyzer::with_default_backends(config)?;
    let reporter = CliReporter::new();
    let report = analyzer.run(&reporter)?;
    Ok(report)
}

fn print_summary(report: &RunReport) {
    println!();
    info!(
        "{} files scanned, {} proprietary renames, {} edition dates applied",
        format!("{}", report.files_scanned).cyan(),
        format!("{}", report.proprietary.count(Tag::PropRenamed)).green(),
        format!(
            "{}",
            report.edit_migration.count(Tag::Edin2Metadt)
                + report.edit_migration.count(Tag::EdinRenamed)
        )
        .green(),
    );

    if !report.warnings_found() {
        info!("{}", "No items to review".green());
        return;
    }

    warn!(
        "{} items to review: {} damaged, {} to-review names, {} inconsistent, {} out of folder bounds, {} failed",
        format!("{}", report.warning_count()).red(),
        format!("{}", report.integrity.count(Tag::DateDamaged)).red(),
        format!("{}", report.integrity.count(Tag::Date2Review)).red(),
        format!("{}", report.consistency.count(Tag::Inconsistent)).red(),
        format!("{}", report.bounds.count(Tag::OutOfBounds)).red(),
        format!("{}", failed_count(report)).red(),
    );
    for folder in report.folders_to_review() {
        warn!("Folder to review: <{}>", folder.display());
    }
    if let Some(folder) = &report.review_folder {
        warn!("Metadata edit copies are in <{}>", folder.display());
    }
}

fn failed_count(report: &RunReport) -> usize {
    [
        &report.proprietary,
        &report.integrity,
        &report.edit_migration,
        &report.consistency,
        &report.bounds,
    ]
    .iter()
    .map(|pass| pass.count(Tag::Failed))
    .sum()
}
