use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::commands::convert::{self, ConvertOptions};
use crate::config;
use crate::logging;

#[derive(Parser, Debug)]
#[command(name = "daylio-export")]
#[command(about = "Convert Daylio exports into Day One import archives", long_about = None)]
pub struct Cli {
    /// Print version and commit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Daylio CSV export, `.daylio` backup, or a folder holding backups
    #[arg(required_unless_present = "version")]
    pub source: Option<PathBuf>,
}

pub fn version_line() -> String {
    format!(
        "daylio-export version {}, commit {}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_COMMIT")
    )
}

fn print_report(report: &CommandReport) {
    for path in &report.outputs {
        println!("{}", path.display());
    }
    for detail in &report.details {
        eprintln!("{}: {detail}", report.command);
    }
    for issue in &report.issues {
        eprintln!("{}: {issue}", report.command);
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", version_line());
        return Ok(());
    }
    let Some(source) = cli.source else {
        return Err(anyhow!("missing source path"));
    };

    logging::init(std::env::var("LOG_LEVEL").ok().as_deref());
    let cfg = config::load_config()?;
    tracing::debug!(?cfg, "loaded configuration");

    let report = convert::run(&ConvertOptions { source }, &cfg)?;
    print_report(&report);
    if !report.ok {
        return Err(anyhow!("{} failed", report.command));
    }
    Ok(())
}
