use crate::error::CliError;
use engine_config::report::summary::ExecutionReport;
use std::{fs, path::Path};
use tracing::info;

pub fn write_report(report: &ExecutionReport, path: &Path) -> Result<(), CliError> {
    let json = report.to_json_pretty()?;
    fs::write(path, json)?;
    info!("Report written to {}", path.display());
    Ok(())
}

pub fn print_report(report: &ExecutionReport) {
    println!("{report}");
}
