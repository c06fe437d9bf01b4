use crate::domain::node::Node;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// One parsed input: identifying fields plus the form subtree.
///
/// Fields are private; a document is read-only once constructed.
#[derive(Debug, Clone)]
pub struct Document {
    form_id: String,
    contract_number: String,
    form: Node,
}

impl Document {
    pub fn new(form_id: String, contract_number: String, form: Node) -> Self {
        Self {
            form_id,
            contract_number,
            form,
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn contract_number(&self) -> &str {
        &self.contract_number
    }

    pub fn form(&self) -> &Node {
        &self.form
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceKind {
    Tag,
    Text,
    Attribute,
}

/// Which side of the comparison a value is exclusive to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    ProductionOnly,
    TestOnly,
}

impl Origin {
    pub fn direction(&self) -> &'static str {
        match self {
            Origin::ProductionOnly => "production -> test",
            Origin::TestOnly => "test -> production",
        }
    }
}

/// One reported difference, localized when the owning node was found.
///
/// `location` is `None` only when localization failed; the record is still
/// emitted so the difference is never silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct DifferenceRecord {
    pub kind: DifferenceKind,
    pub origin: Origin,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
    pub location: Option<String>,
}

impl DifferenceRecord {
    /// One human-readable line: `<direction>: <subject> located at <path>`.
    pub fn render(&self) -> String {
        let subject = match self.kind {
            DifferenceKind::Tag => format!("tag <{}>", self.value),
            DifferenceKind::Text => format!("text \"{}\"", self.value),
            DifferenceKind::Attribute => {
                let attrs = self
                    .attributes
                    .as_ref()
                    .map(|a| {
                        a.iter()
                            .map(|(k, v)| format!("{}=\"{}\"", k, v))
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default();
                format!("<{} {}>", self.value, attrs)
            }
        };
        match &self.location {
            Some(location) => format!(
                "{}: {} located at {}",
                self.origin.direction(),
                subject,
                location
            ),
            None => format!(
                "{}: {} (location unresolved)",
                self.origin.direction(),
                subject
            ),
        }
    }
}

/// A parsed input ready for comparison: display name, content digest and
/// the document itself.
#[derive(Debug)]
pub struct ParsedInput {
    pub name: String,
    pub digest: String,
    pub document: Document,
}

#[derive(Serialize)]
pub struct ComparisonReport {
    pub production: String,
    pub test: String,
    pub form_id: String,
    pub contract_number: String,
    pub production_digest: String,
    pub test_digest: String,
    pub clean: bool,
    pub tags: Vec<DifferenceRecord>,
    pub texts: Vec<DifferenceRecord>,
    pub attributes: Vec<DifferenceRecord>,
}

impl ComparisonReport {
    pub fn records(&self) -> impl Iterator<Item = &DifferenceRecord> {
        self.tags.iter().chain(&self.texts).chain(&self.attributes)
    }
}

#[derive(Serialize)]
pub struct SkippedInput {
    pub file: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct RunReport {
    pub skipped: Vec<SkippedInput>,
    pub comparison: ComparisonReport,
}

#[derive(Serialize)]
pub struct ShowReport {
    pub file: String,
    pub form_id: String,
    pub contract_number: String,
    pub form_tag: String,
    pub node_count: usize,
    pub digest: String,
}
