#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use swipe_core::SwipeConfig;

use crate::error::Result;
use crate::logging::{self, LogFormat};
use crate::replay::{render_text, run_trace};
use crate::trace::{Trace, load_config};

#[derive(Debug, Parser)]
#[command(
    name = "swipe-replay",
    about = "Replay a JSON pointer trace through the swipe controller and print the layouts",
    version
)]
pub struct Cli {
    /// Trace file to replay.
    pub trace: PathBuf,

    /// Controller configuration (JSON). Missing fields use defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the replay report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    run(&cli)
}

pub fn run(cli: &Cli) -> Result<()> {
    print!("{}", render(cli)?);
    Ok(())
}

/// Replay the trace named by `cli` and return the formatted report.
pub fn render(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SwipeConfig::default(),
    };
    let trace = Trace::load(&cli.trace)?;
    let report = run_trace(&trace, config)?;
    if cli.json {
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(render_text(&report))
    }
}
