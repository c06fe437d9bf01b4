use crate::domain::models::{ComparisonReport, Document, ParsedInput};
use crate::services::differ::{attribute_differences, tag_differences, text_differences};
use crate::services::reporter::{
    report_attribute_differences, report_tag_differences, report_text_differences,
};
use crate::services::walker::flatten;
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error("form ids do not match: production \"{production}\" vs test \"{test}\"")]
    FormIdMismatch { production: String, test: String },
    #[error("contract numbers do not match: production \"{production}\" vs test \"{test}\"")]
    ContractNumberMismatch { production: String, test: String },
    #[error("need at least two parsable documents, found {found}")]
    NotEnoughDocuments { found: usize },
}

/// Both identifying fields must match before any differencing is
/// attempted; a mismatch aborts the whole comparison.
pub fn check_preconditions(production: &Document, test: &Document) -> Result<(), CompareError> {
    if production.form_id() != test.form_id() {
        return Err(CompareError::FormIdMismatch {
            production: production.form_id().to_string(),
            test: test.form_id().to_string(),
        });
    }
    if production.contract_number() != test.contract_number() {
        return Err(CompareError::ContractNumberMismatch {
            production: production.contract_number().to_string(),
            test: test.contract_number().to_string(),
        });
    }
    debug!("form ids and contract numbers match");
    Ok(())
}

/// Run the full pipeline over two parsed inputs: precondition gate,
/// flatten, three facet differences, localization, report assembly.
pub fn compare(production: &ParsedInput, test: &ParsedInput) -> Result<ComparisonReport, CompareError> {
    check_preconditions(&production.document, &test.document)?;
    info!(
        contract_number = %production.document.contract_number(),
        "starting comparison"
    );

    let mut report = ComparisonReport {
        production: production.name.clone(),
        test: test.name.clone(),
        form_id: production.document.form_id().to_string(),
        contract_number: production.document.contract_number().to_string(),
        production_digest: production.digest.clone(),
        test_digest: test.digest.clone(),
        clean: true,
        tags: Vec::new(),
        texts: Vec::new(),
        attributes: Vec::new(),
    };

    if production.digest == test.digest {
        debug!("inputs are byte-identical, skipping differencing");
        return Ok(report);
    }

    let production_form = production.document.form();
    let test_form = test.document.form();
    let production_seq = flatten(production_form);
    let test_seq = flatten(test_form);

    info!("checking for differences in tags");
    let tags = tag_differences(&production_seq, &test_seq);
    report.tags = report_tag_differences(&tags, production_form, test_form);

    info!("checking for differences in text content");
    let texts = text_differences(&production_seq, &test_seq);
    report.texts = report_text_differences(&texts, production_form, test_form);

    info!("checking for differences in attributes");
    let attributes = attribute_differences(&production_seq, &test_seq);
    report.attributes = report_attribute_differences(&attributes, production_form, test_form);

    report.clean = tags.is_empty() && texts.is_empty() && attributes.is_empty();
    if report.clean {
        info!("no differences found");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{check_preconditions, compare, CompareError};
    use crate::domain::models::{Document, ParsedInput};
    use crate::domain::node::Node;

    fn doc(form_id: &str, contract: &str, form: Node) -> Document {
        Document::new(form_id.to_string(), contract.to_string(), form)
    }

    fn input(name: &str, digest: &str, document: Document) -> ParsedInput {
        ParsedInput {
            name: name.to_string(),
            digest: digest.to_string(),
            document,
        }
    }

    #[test]
    fn mismatched_form_ids_abort_before_differencing() {
        let a = doc("F1", "4711", Node::new("form"));
        let b = doc("F2", "4711", Node::new("form"));
        assert!(matches!(
            check_preconditions(&a, &b),
            Err(CompareError::FormIdMismatch { .. })
        ));
    }

    #[test]
    fn mismatched_contract_numbers_abort_before_differencing() {
        let a = doc("F1", "4711", Node::new("form"));
        let b = doc("F1", "4712", Node::new("form"));
        assert!(matches!(
            check_preconditions(&a, &b),
            Err(CompareError::ContractNumberMismatch { .. })
        ));
    }

    #[test]
    fn matching_documents_produce_a_clean_report() {
        let mut form = Node::new("form");
        form.children.push(Node::new("a"));
        let a = input("prod.xml", "d1", doc("F1", "4711", form.clone()));
        let b = input("test.xml", "d2", doc("F1", "4711", form));

        let report = compare(&a, &b).unwrap();
        assert!(report.clean);
        assert!(report.tags.is_empty());
        assert!(report.texts.is_empty());
        assert!(report.attributes.is_empty());
    }

    #[test]
    fn identical_digests_short_circuit_to_clean() {
        let form = Node::new("form");
        let a = input("prod.xml", "same", doc("F1", "4711", form.clone()));
        let b = input("test.xml", "same", doc("F1", "4711", form));
        assert!(compare(&a, &b).unwrap().clean);
    }

    #[test]
    fn differing_trees_produce_located_records() {
        let mut prod_form = Node::new("form");
        let mut a = Node::new("a");
        a.children.push(Node::new("b"));
        prod_form.children.push(a);

        let mut test_form = Node::new("form");
        let mut a = Node::new("a");
        a.children.push(Node::new("b"));
        a.children.push(Node::new("c"));
        test_form.children.push(a);

        let prod = input("prod.xml", "d1", doc("F1", "4711", prod_form));
        let test = input("test.xml", "d2", doc("F1", "4711", test_form));
        let report = compare(&prod, &test).unwrap();
        assert!(!report.clean);
        assert_eq!(report.tags.len(), 1);
        assert_eq!(report.tags[0].location.as_deref(), Some("<form>, <a>, <c>"));
    }
}
