use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod domain;
mod services;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let mut config = services::config::load_config(cli.config.as_deref())?;
    if let Some(tag) = &cli.form_tag {
        config.form_tag = tag.clone();
    }
    if let Some(tag) = &cli.contract_tag {
        config.contract_tag = tag.clone();
    }
    if let Some(attribute) = &cli.form_id_attribute {
        config.form_id_attribute = attribute.clone();
    }
    commands::handle_commands(cli, &config)
}

/// Diagnostics go to stderr so `--json` output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "formdiff=debug"
    } else {
        "formdiff=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
