use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "formdiff",
    version,
    about = "Compare production and test XML renderings of forms",
    after_help = "Exit codes: 0 clean, 1 differences found, 2 error"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: ~/.config/formdiff/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[arg(long, global = true, help = "Tag of the form element to compare")]
    pub form_tag: Option<String>,
    #[arg(long, global = true, help = "Tag of the contract number element")]
    pub contract_tag: Option<String>,
    #[arg(long, global = true, help = "Attribute carrying the form id")]
    pub form_id_attribute: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Compare {
        production: PathBuf,
        test: PathBuf,
    },
    Run {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    Show {
        file: PathBuf,
    },
}
