use crate::cli::{Cli, Commands};
use crate::domain::models::{ComparisonReport, JsonOut, ParsedInput, RunReport, ShowReport};
use crate::services::compare::{compare, CompareError};
use crate::services::config::CompareConfig;
use crate::services::discovery::collect_documents;
use crate::services::output::print_one;
use crate::services::parser::{file_digest, parse_document};
use std::path::Path;
use tracing::warn;

/// Dispatch the selected command. Returns whether the run was clean; the
/// caller maps that to the process exit code.
pub fn handle_commands(cli: &Cli, config: &CompareConfig) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Compare { production, test } => {
            let production = load_input(production, config)?;
            let test = load_input(test, config)?;
            let report = compare(&production, &test)?;
            print_comparison(cli.json, &report)?;
            Ok(report.clean)
        }
        Commands::Run { data_dir } => {
            let dir = data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
            let outcome = collect_documents(&dir, config)?;
            if outcome.inputs.len() < 2 {
                return Err(CompareError::NotEnoughDocuments {
                    found: outcome.inputs.len(),
                }
                .into());
            }
            if outcome.inputs.len() > 2 {
                let ignored: Vec<&str> = outcome.inputs[2..]
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect();
                warn!(files = ?ignored, "more than two documents found, comparing the first two");
            }
            let report = compare(&outcome.inputs[0], &outcome.inputs[1])?;
            let clean = report.clean;
            let run_report = RunReport {
                skipped: outcome.skipped,
                comparison: report,
            };
            print_run(cli.json, &run_report)?;
            Ok(clean)
        }
        Commands::Show { file } => {
            let input = load_input(file, config)?;
            let report = ShowReport {
                file: input.name,
                form_id: input.document.form_id().to_string(),
                contract_number: input.document.contract_number().to_string(),
                form_tag: input.document.form().tag.clone(),
                node_count: input.document.form().subtree_size(),
                digest: input.digest,
            };
            print_one(cli.json, report, |r| {
                format!(
                    "file: {}\nform id: {}\ncontract number: {}\nform tag: {}\nnodes: {}\ndigest: {}",
                    r.file, r.form_id, r.contract_number, r.form_tag, r.node_count, r.digest
                )
            })?;
            Ok(true)
        }
    }
}

fn load_input(path: &Path, config: &CompareConfig) -> anyhow::Result<ParsedInput> {
    let digest = file_digest(path)?;
    let document = parse_document(path, config)?;
    Ok(ParsedInput {
        name: path.display().to_string(),
        digest,
        document,
    })
}

fn print_comparison(json: bool, report: &ComparisonReport) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: report
            })?
        );
    } else {
        if report.clean {
            println!(
                "clean: {} and {} match for form {}",
                report.production, report.test, report.form_id
            );
        }
        for record in report.records() {
            println!("{}", record.render());
        }
    }
    Ok(())
}

fn print_run(json: bool, report: &RunReport) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: report
            })?
        );
    } else {
        for skipped in &report.skipped {
            println!("skipped {}: {}", skipped.file, skipped.reason);
        }
        print_comparison(false, &report.comparison)?;
    }
    Ok(())
}
