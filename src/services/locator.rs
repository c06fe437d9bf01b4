use crate::domain::node::Node;
use std::collections::BTreeMap;
use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum LocateError {
    #[error("node <{target}> not found under <{root}>")]
    NodeNotFound { root: String, target: String },
}

/// Root-to-node tag path. The last tag is always the target's own tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub tags: Vec<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.tags.iter().map(|t| format!("<{}>", t)).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

/// Reconstruct the ancestor chain from `root` down to `target`.
///
/// Identity is instance identity: the search compares node addresses, so
/// the result is the true parent chain in the tree the target was taken
/// from, never a document-order prefix. A target from a different tree is
/// an error, not a partial path.
pub fn locate(root: &Node, target: &Node) -> Result<Location, LocateError> {
    let mut trail = Vec::new();
    if descend(root, target, &mut trail) {
        Ok(Location {
            tags: trail.into_iter().map(|n| n.tag.clone()).collect(),
        })
    } else {
        Err(LocateError::NodeNotFound {
            root: root.tag.clone(),
            target: target.tag.clone(),
        })
    }
}

fn descend<'a>(current: &'a Node, target: &Node, trail: &mut Vec<&'a Node>) -> bool {
    trail.push(current);
    if std::ptr::eq(current, target) {
        return true;
    }
    for child in &current.children {
        if descend(child, target, trail) {
            return true;
        }
    }
    trail.pop();
    false
}

/// First node in document order with the given tag.
pub fn find_by_tag<'a>(root: &'a Node, tag: &str) -> Option<&'a Node> {
    crate::services::walker::flatten(root)
        .into_iter()
        .find(|n| n.tag == tag)
}

/// First node in document order whose text contains `needle`.
///
/// Substring containment rather than equality: differing texts are
/// localized even when surrounding formatting differs slightly.
pub fn find_by_text<'a>(root: &'a Node, needle: &str) -> Option<&'a Node> {
    crate::services::walker::flatten(root)
        .into_iter()
        .find(|n| n.text.as_deref().is_some_and(|t| t.contains(needle)))
}

/// First node in document order with the given tag and exactly the given
/// attribute map.
pub fn find_by_attributes<'a>(
    root: &'a Node,
    tag: &str,
    attributes: &BTreeMap<String, String>,
) -> Option<&'a Node> {
    crate::services::walker::flatten(root)
        .into_iter()
        .find(|n| n.tag == tag && &n.attributes == attributes)
}

#[cfg(test)]
mod tests {
    use super::{find_by_attributes, find_by_tag, find_by_text, locate};
    use crate::domain::node::Node;

    fn sample() -> Node {
        // <form><a><b/><c/></a><d>19,00 EUR</d></form>
        let mut form = Node::new("form");
        let mut a = Node::new("a");
        a.children.push(Node::new("b"));
        let mut c = Node::new("c");
        c.attributes.insert("id".to_string(), "7".to_string());
        a.children.push(c);
        form.children.push(a);
        let mut d = Node::new("d");
        d.text = Some("19,00 EUR".to_string());
        form.children.push(d);
        form
    }

    #[test]
    fn locate_returns_the_true_ancestor_chain() {
        let form = sample();
        let c = find_by_tag(&form, "c").unwrap();
        let location = locate(&form, c).unwrap();
        assert_eq!(location.tags, ["form", "a", "c"]);
        assert_eq!(location.to_string(), "<form>, <a>, <c>");
    }

    #[test]
    fn locate_does_not_include_preceding_siblings() {
        // <d> follows <a> in document order but is a direct child of the
        // root; a prefix-based "ancestry" would wrongly include <a>, <b>
        // and <c>.
        let form = sample();
        let d = find_by_tag(&form, "d").unwrap();
        let location = locate(&form, d).unwrap();
        assert_eq!(location.tags, ["form", "d"]);
    }

    #[test]
    fn locate_rejects_foreign_nodes() {
        let form = sample();
        let stranger = Node::new("c");
        assert!(locate(&form, &stranger).is_err());
    }

    #[test]
    fn last_location_tag_is_the_targets_own() {
        let form = sample();
        for tag in ["form", "a", "b", "c", "d"] {
            let node = find_by_tag(&form, tag).unwrap();
            let location = locate(&form, node).unwrap();
            assert_eq!(location.tags.last().unwrap(), tag);
        }
    }

    #[test]
    fn find_by_text_matches_substrings() {
        let form = sample();
        let node = find_by_text(&form, "19,00").unwrap();
        assert_eq!(node.tag, "d");
        assert!(find_by_text(&form, "42,00").is_none());
    }

    #[test]
    fn find_by_attributes_requires_exact_map() {
        let form = sample();
        let c = find_by_tag(&form, "c").unwrap();
        assert!(find_by_attributes(&form, "c", &c.attributes).is_some());
        let mut other = c.attributes.clone();
        other.insert("extra".to_string(), "x".to_string());
        assert!(find_by_attributes(&form, "c", &other).is_none());
    }
}
