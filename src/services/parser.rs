use crate::domain::models::Document;
use crate::domain::node::Node;
use crate::services::config::CompareConfig;
use crate::services::locator::find_by_tag;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("mismatched closing tag at byte {offset}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        offset: usize,
        expected: String,
        found: String,
    },
    #[error("duplicate attribute \"{name}\" at byte {offset}")]
    DuplicateAttribute { name: String, offset: usize },
    #[error("unknown entity reference &{name};")]
    UnknownEntity { name: String },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("content after document root at byte {offset}")]
    TrailingContent { offset: usize },
    #[error("no <{tag}> element in document")]
    MissingFormElement { tag: String },
    #[error("form element has no \"{attribute}\" attribute")]
    MissingFormId { attribute: String },
    #[error("no <{tag}> element with text in document")]
    MissingContractNumber { tag: String },
}

fn syntax(offset: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        offset,
        message: message.into(),
    }
}

/// Parse a whole XML document into its root element.
///
/// Comments, processing instructions and the DOCTYPE are skipped, so the
/// resulting tree is clean element content; the comparison never sees
/// annotations. Element text is the character data before the first child
/// (trimmed; whitespace-only counts as absent).
pub fn parse_str(input: &str) -> Result<Node, ParseError> {
    let mut reader = Reader { src: input, pos: 0 };
    skip_misc(&mut reader)?;
    let root = parse_element(&mut reader)?;
    skip_misc(&mut reader)?;
    if reader.pos < reader.src.len() {
        return Err(ParseError::TrailingContent { offset: reader.pos });
    }
    Ok(root)
}

pub fn parse_file(path: &Path) -> Result<Node, ParseError> {
    let raw = std::fs::read_to_string(path)?;
    let root = parse_str(&raw)?;
    debug!(
        file = %path.display(),
        nodes = root.subtree_size(),
        "parsed document"
    );
    Ok(root)
}

/// Parse a file and extract the identifying fields plus the form subtree.
///
/// The form id is read from the configured attribute of the first form
/// element in document order; the contract number is the text of the
/// first matching descendant. The document owns the form subtree only;
/// surrounding envelope elements are discarded.
pub fn parse_document(path: &Path, config: &CompareConfig) -> Result<Document, ParseError> {
    let root = parse_file(path)?;

    let form = find_by_tag(&root, &config.form_tag).ok_or_else(|| ParseError::MissingFormElement {
        tag: config.form_tag.clone(),
    })?;
    let form_id = form
        .attributes
        .get(&config.form_id_attribute)
        .cloned()
        .ok_or_else(|| ParseError::MissingFormId {
            attribute: config.form_id_attribute.clone(),
        })?;
    let contract_number = find_by_tag(&root, &config.contract_tag)
        .and_then(|n| n.text.clone())
        .ok_or_else(|| ParseError::MissingContractNumber {
            tag: config.contract_tag.clone(),
        })?;

    let form = take_subtree(root, &config.form_tag).ok_or_else(|| ParseError::MissingFormElement {
        tag: config.form_tag.clone(),
    })?;

    debug!(form_id = %form_id, contract_number = %contract_number, "created document");
    Ok(Document::new(form_id, contract_number, form))
}

/// SHA-256 of the raw input bytes, hex encoded.
pub fn file_digest(path: &Path) -> Result<String, ParseError> {
    let raw = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&raw);
    Ok(hex::encode(hasher.finalize()))
}

/// Detach the first subtree (pre-order) whose root carries `tag`.
fn take_subtree(node: Node, tag: &str) -> Option<Node> {
    if node.tag == tag {
        return Some(node);
    }
    for child in node.children {
        if let Some(found) = take_subtree(child, tag) {
            return Some(found);
        }
    }
    None
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Advance past the next occurrence of `marker`, discarding everything
    /// up to and including it.
    fn skip_past(&mut self, marker: &str) -> Result<(), ParseError> {
        match self.rest().find(marker) {
            Some(i) => {
                self.pos += i + marker.len();
                Ok(())
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    /// Everything up to the next occurrence of `marker`; the marker itself
    /// is consumed.
    fn take_until(&mut self, marker: &str) -> Result<&'a str, ParseError> {
        match self.rest().find(marker) {
            Some(i) => {
                let taken = &self.rest()[..i];
                self.pos += i + marker.len();
                Ok(taken)
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn read_name(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.bump();
            }
            _ => return Err(syntax(self.pos, "expected a name")),
        }
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.bump();
        }
        Ok(&self.src[start..self.pos])
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn skip_misc(reader: &mut Reader) -> Result<(), ParseError> {
    loop {
        reader.skip_whitespace();
        if reader.eat("<?") {
            reader.skip_past("?>")?;
        } else if reader.eat("<!--") {
            reader.skip_past("-->")?;
        } else if reader.rest().starts_with("<!DOCTYPE") {
            reader.skip_past(">")?;
        } else {
            return Ok(());
        }
    }
}

fn parse_element(reader: &mut Reader) -> Result<Node, ParseError> {
    if !reader.eat("<") {
        return Err(syntax(reader.pos, "expected element"));
    }
    let name = reader.read_name()?;
    let mut node = Node::new(name);

    loop {
        reader.skip_whitespace();
        if reader.eat("/>") {
            return Ok(node);
        }
        if reader.eat(">") {
            break;
        }
        let attr_offset = reader.pos;
        let attr = reader.read_name()?;
        reader.skip_whitespace();
        if !reader.eat("=") {
            return Err(syntax(reader.pos, "expected '=' after attribute name"));
        }
        reader.skip_whitespace();
        let quote = match reader.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(syntax(reader.pos, "expected quoted attribute value")),
        };
        let raw = reader.take_until(&quote.to_string())?;
        let value = decode_entities(raw)?;
        if node.attributes.insert(attr.to_string(), value).is_some() {
            return Err(ParseError::DuplicateAttribute {
                name: attr.to_string(),
                offset: attr_offset,
            });
        }
    }

    let mut leading_text = String::new();
    let mut saw_child = false;
    loop {
        if reader.eat("<!--") {
            reader.skip_past("-->")?;
            continue;
        }
        if reader.eat("<![CDATA[") {
            let raw = reader.take_until("]]>")?;
            if !saw_child {
                leading_text.push_str(raw);
            }
            continue;
        }
        if reader.eat("<?") {
            reader.skip_past("?>")?;
            continue;
        }
        if reader.eat("</") {
            let close_offset = reader.pos;
            let close = reader.read_name()?;
            reader.skip_whitespace();
            if !reader.eat(">") {
                return Err(syntax(reader.pos, "expected '>' in closing tag"));
            }
            if close != node.tag {
                return Err(ParseError::MismatchedClosingTag {
                    offset: close_offset,
                    expected: node.tag.clone(),
                    found: close.to_string(),
                });
            }
            break;
        }
        if reader.rest().starts_with('<') {
            node.children.push(parse_element(reader)?);
            saw_child = true;
            continue;
        }
        match reader.rest().find('<') {
            Some(i) => {
                let raw = &reader.rest()[..i];
                if !saw_child {
                    leading_text.push_str(&decode_entities(raw)?);
                }
                reader.pos += i;
            }
            None => return Err(ParseError::UnexpectedEof),
        }
    }

    let trimmed = leading_text.trim();
    node.text = (!trimmed.is_empty()).then(|| trimmed.to_string());
    Ok(node)
}

fn decode_entities(raw: &str) -> Result<String, ParseError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let end = rest.find(';').ok_or_else(|| ParseError::UnknownEntity {
            name: rest[1..].chars().take(12).collect(),
        })?;
        let name = &rest[1..end];
        match name {
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "amp" => out.push('&'),
            "apos" => out.push('\''),
            "quot" => out.push('"'),
            _ => {
                let code = if let Some(hex_digits) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                    u32::from_str_radix(hex_digits, 16).ok()
                } else if let Some(digits) = name.strip_prefix('#') {
                    digits.parse::<u32>().ok()
                } else {
                    None
                };
                let c = code.and_then(char::from_u32).ok_or_else(|| {
                    ParseError::UnknownEntity {
                        name: name.to_string(),
                    }
                })?;
                out.push(c);
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
