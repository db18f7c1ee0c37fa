//! Command line parsing

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const SCRIPT_HELP: &str = "Script lines:
  click-category <id> | click-image <index> | thumb <index> | key <name>
  swipe left|right | close | overlay | next | prev | home | back | forward";

#[derive(Debug, Parser)]
#[command(
    name = "phalak_gallery",
    version,
    about = "Static image gallery tools",
    after_help = SCRIPT_HELP
)]
pub struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log to stderr as well as the log file
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum CliCommand {
    /// Scan the image tree, write the catalog and the share pages
    Generate {
        #[arg(long, value_name = "DIR")]
        source: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        pages: Option<PathBuf>,
        #[arg(long, action = ArgAction::SetTrue)]
        no_pages: bool,
    },
    /// Boot a headless session at a URL and report the view
    Resolve {
        url: String,
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        /// Path a share page handed over
        #[arg(long, value_name = "PATH")]
        redirect: Option<String>,
    },
    /// Drive a headless session through a script of input events
    Replay {
        script: PathBuf,
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        /// Starting URL (default: home)
        #[arg(long)]
        url: Option<String>,
    },
}
