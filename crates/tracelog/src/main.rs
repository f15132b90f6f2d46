// Tracelog - Ethereum simulation trace reporter
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Tracelog - replay recorded simulation sessions in the terminal.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use alloy_primitives::U256;
use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Result, WrapErr};
use tracelog_common::{
    types::ReporterEvent, wei_to_human_readable, ColorMode, ReporterConfig,
};
use tracelog_reporter::TraceReporter;
use tracing::{debug, info};

/// Command-line interface for tracelog
#[derive(Debug, Parser)]
#[command(name = "tracelog")]
#[command(about = "Tracelog - Render simulated chain activity as a readable terminal report")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.tracelog.toml)
    #[arg(long, env = "TRACELOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to use colors, overrides the config file
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// Start with buffered logging disabled; only console.log output is shown
    #[arg(long)]
    pub quiet_buffer: bool,

    /// Also write diagnostics to a log file
    #[arg(long)]
    pub file_logging: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Color choices accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    /// Color when stdout is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a recorded session of reporter events
    Replay {
        /// JSON file holding an array of events, `-` for stdin
        session: PathBuf,
    },
    /// Show a wei amount the way the report does
    Units {
        /// Amount in wei, decimal or 0x-prefixed hex
        wei: String,
    },
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracelog_common::init_logging("tracelog", cli.file_logging)
        .wrap_err("Failed to initialize logging")?;

    match &cli.command {
        Commands::Replay { session } => {
            let config = load_config(&cli)?;
            replay_session(session, &config)
        }
        Commands::Units { wei } => {
            let wei: U256 = wei.parse().wrap_err_with(|| format!("Invalid wei amount: {wei}"))?;
            println!("{}", wei_to_human_readable(wei));
            Ok(())
        }
    }
}

/// Merge the config file with the command-line overrides
fn load_config(cli: &Cli) -> Result<ReporterConfig> {
    let mut config = ReporterConfig::load(cli.config.as_deref())?;

    if let Some(color) = cli.color {
        config.color = color.into();
    }
    if cli.quiet_buffer {
        config.enabled = false;
    }

    debug!(?config, "Effective reporter configuration");
    Ok(config)
}

fn read_session(path: &Path) -> Result<Vec<ReporterEvent>> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).wrap_err("Failed to read session from stdin")?;
        content
    } else {
        fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read session file {}", path.display()))?
    };

    serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse session {}", path.display()))
}

/// Drive a terminal reporter with every event of the session
fn replay_session(path: &Path, config: &ReporterConfig) -> Result<()> {
    let events = read_session(path)?;
    info!(events = events.len(), "Replaying session {}", path.display());

    let mut reporter = TraceReporter::stdout(config);
    reporter.replay(&events).wrap_err("Failed to write report")?;

    // Whatever was buffered after the last method event
    if reporter.print_logs()? {
        reporter.print_empty_line()?;
    }

    Ok(())
}
