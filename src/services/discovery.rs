use crate::domain::models::{ParsedInput, SkippedInput};
use crate::services::config::CompareConfig;
use crate::services::parser::{file_digest, parse_document};
use std::path::Path;
use tracing::{debug, error, warn};

pub struct DiscoveryOutcome {
    pub inputs: Vec<ParsedInput>,
    pub skipped: Vec<SkippedInput>,
}

/// Parse every XML file in `dir`, sorted by file name.
///
/// A file that fails to parse is logged, recorded as skipped and excluded;
/// the run continues with the remaining inputs. Non-XML files are ignored
/// with a warning. Only an unreadable directory is fatal here.
pub fn collect_documents(dir: &Path, config: &CompareConfig) -> anyhow::Result<DiscoveryOutcome> {
    debug!(dir = %dir.display(), "parsing documents");
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut inputs = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let is_xml = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
        if !is_xml {
            warn!(file = %name, "file is not in xml format, ignoring");
            continue;
        }
        let parsed = file_digest(&path)
            .and_then(|digest| parse_document(&path, config).map(|document| (digest, document)));
        match parsed {
            Ok((digest, document)) => inputs.push(ParsedInput {
                name,
                digest,
                document,
            }),
            Err(e) => {
                error!(file = %name, error = %e, "file cannot be parsed, skipping");
                skipped.push(SkippedInput {
                    file: name,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(DiscoveryOutcome { inputs, skipped })
}

#[cfg(test)]
mod tests {
    use super::collect_documents;
    use crate::services::config::CompareConfig;
    use std::fs;

    fn form_xml(form_id: &str, contract: &str) -> String {
        format!(
            "<formular id=\"{}\"><v_vertragsnummer>{}</v_vertragsnummer></formular>",
            form_id, contract
        )
    }

    #[test]
    fn discovery_sorts_skips_and_continues() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b_test.xml"), form_xml("F1", "4711")).unwrap();
        fs::write(tmp.path().join("a_prod.xml"), form_xml("F1", "4711")).unwrap();
        fs::write(tmp.path().join("broken.xml"), "<formular id=").unwrap();
        fs::write(tmp.path().join("notes.txt"), "not xml").unwrap();

        let outcome = collect_documents(tmp.path(), &CompareConfig::default()).unwrap();
        let names: Vec<&str> = outcome.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a_prod.xml", "b_test.xml"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].file, "broken.xml");
    }
}
