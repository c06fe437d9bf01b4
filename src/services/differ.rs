use crate::domain::node::Node;
use std::collections::{BTreeMap, BTreeSet};

/// Symmetric difference of two value sets, partitioned by origin.
///
/// The two sides are disjoint; swapping the inputs swaps the partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceSet<T: Ord> {
    pub only_in_production: BTreeSet<T>,
    pub only_in_test: BTreeSet<T>,
}

impl<T: Ord> DifferenceSet<T> {
    pub fn is_empty(&self) -> bool {
        self.only_in_production.is_empty() && self.only_in_test.is_empty()
    }

    fn partition(production: BTreeSet<T>, test: BTreeSet<T>) -> Self
    where
        T: Clone,
    {
        Self {
            only_in_production: production.difference(&test).cloned().collect(),
            only_in_test: test.difference(&production).cloned().collect(),
        }
    }
}

/// One side of an attribute mismatch: the owning tag plus the full
/// attribute map of the element at the mismatching position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttributeEntry {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

/// Tags present in one sequence but not the other.
///
/// Set semantics: repeated sibling tags collapse to a single entry, so an
/// extra occurrence of an already-present tag is invisible here.
/// Downstream localization uses one representative occurrence per value.
pub fn tag_differences(production: &[&Node], test: &[&Node]) -> DifferenceSet<String> {
    let tags = |nodes: &[&Node]| -> BTreeSet<String> {
        nodes.iter().map(|n| n.tag.clone()).collect()
    };
    DifferenceSet::partition(tags(production), tags(test))
}

/// Text values present in one sequence but not the other. Nodes without
/// text contribute no entry.
pub fn text_differences(production: &[&Node], test: &[&Node]) -> DifferenceSet<String> {
    let texts = |nodes: &[&Node]| -> BTreeSet<String> {
        nodes
            .iter()
            .filter_map(|n| n.text.as_ref())
            .filter(|t| !t.is_empty())
            .cloned()
            .collect()
    };
    DifferenceSet::partition(texts(production), texts(test))
}

/// Attribute mismatches between the two sequences.
///
/// Attributed nodes are grouped by tag in encounter order; for every tag
/// present on both sides the grouped attribute maps are compared position
/// by position, up to the shorter list's length. A mismatch yields one
/// entry per side. Excess attributed elements beyond the shorter length
/// are not compared and not reported; this is an intentional limitation,
/// not a multiset comparison.
pub fn attribute_differences(
    production: &[&Node],
    test: &[&Node],
) -> DifferenceSet<AttributeEntry> {
    let groups_prod = group_attributes(production);
    let groups_test = group_attributes(test);

    let mut only_in_production = BTreeSet::new();
    let mut only_in_test = BTreeSet::new();

    for (tag, prod_maps) in &groups_prod {
        let Some(test_maps) = groups_test.iter().find(|(t, _)| t == tag).map(|(_, m)| m) else {
            continue;
        };
        for (prod_map, test_map) in prod_maps.iter().zip(test_maps.iter()) {
            if prod_map != test_map {
                only_in_production.insert(AttributeEntry {
                    tag: tag.clone(),
                    attributes: prod_map.clone(),
                });
                only_in_test.insert(AttributeEntry {
                    tag: tag.clone(),
                    attributes: test_map.clone(),
                });
            }
        }
    }

    DifferenceSet {
        only_in_production,
        only_in_test,
    }
}

/// Group the attribute maps of attributed nodes by tag, keeping encounter
/// order of both tags and occurrences.
fn group_attributes(nodes: &[&Node]) -> Vec<(String, Vec<BTreeMap<String, String>>)> {
    let mut groups: Vec<(String, Vec<BTreeMap<String, String>>)> = Vec::new();
    for node in nodes.iter().filter(|n| n.has_attributes()) {
        match groups.iter_mut().find(|(tag, _)| *tag == node.tag) {
            Some((_, maps)) => maps.push(node.attributes.clone()),
            None => groups.push((node.tag.clone(), vec![node.attributes.clone()])),
        }
    }
    groups
}
