//! Front-matter parsing
//!
//! Posts only ever read a handful of scalar and list fields, so this is a
//! small line parser for the `---` delimited block rather than a full YAML
//! document parser:
//!
//! ```text
//! ---
//! title: "Ghana Health Policy QA"
//! date: March 3, 2025
//! readTime: 6 min
//! tags: [NLP, RAG]
//! ---
//! Body...
//! ```
//!
//! Block lists (`tags:` followed by `- item` lines) are accepted too.

use indexmap::IndexMap;
use thiserror::Error;

/// Why a front-matter block could not be split from its body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontMatterError {
    #[error("missing opening `---` delimiter")]
    MissingOpening,
    #[error("missing closing `---` delimiter")]
    MissingClosing,
}

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

/// Parsed front-matter fields, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Split `content` into its front-matter and the remaining body
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let mut lines = content.split_inclusive('\n');
        let mut offset = match lines.next() {
            Some(first) if is_delimiter(first) => first.len(),
            _ => return Err(FrontMatterError::MissingOpening),
        };
        let mut block = Vec::new();
        let mut closed = false;

        for line in lines {
            offset += line.len();
            if is_delimiter(line) {
                closed = true;
                break;
            }
            block.push(line);
        }

        if !closed {
            return Err(FrontMatterError::MissingClosing);
        }

        let body = content[offset..].trim_start_matches(['\n', '\r']);
        Ok((Self::parse_block(&block), body))
    }

    fn parse_block(lines: &[&str]) -> Self {
        let mut fields: IndexMap<String, FieldValue> = IndexMap::new();
        // Key whose value is being collected from `- item` lines
        let mut open_list: Option<String> = None;

        for raw in lines {
            let line = raw.trim_end();
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(item) = list_item(trimmed) {
                match open_list
                    .as_ref()
                    .and_then(|key| fields.get_mut(key.as_str()))
                {
                    Some(FieldValue::List(items)) => {
                        let item = unquote(item);
                        if !item.is_empty() {
                            items.push(item);
                        }
                    }
                    _ => tracing::debug!("Ignoring stray list item in front-matter: {}", trimmed),
                }
                continue;
            }

            // Nested mappings are not part of the format
            if line.starts_with([' ', '\t']) {
                tracing::debug!("Ignoring indented front-matter line: {}", trimmed);
                continue;
            }

            match trimmed.split_once(':') {
                Some((key, value)) if is_key(key) => {
                    let key = key.to_string();
                    let value = value.trim();
                    if value.is_empty() {
                        fields.insert(key.clone(), FieldValue::List(Vec::new()));
                        open_list = Some(key);
                    } else {
                        fields.insert(key, parse_value(value));
                        open_list = None;
                    }
                }
                _ => {
                    tracing::debug!("Ignoring malformed front-matter line: {}", trimmed);
                    open_list = None;
                }
            }
        }

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Scalar value of `key`; list values and missing keys yield `None`
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FieldValue::Scalar(s) => Some(s.as_str()),
            FieldValue::List(_) => None,
        }
    }

    /// First scalar found under any of `keys`
    pub fn str_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.str(key))
    }

    /// List value of `key`; a scalar counts as a one-element list
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(FieldValue::List(items)) => items.clone(),
            Some(FieldValue::Scalar(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

fn is_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn list_item(line: &str) -> Option<&str> {
    if line == "-" {
        Some("")
    } else {
        line.strip_prefix("- ").map(str::trim)
    }
}

fn parse_value(value: &str) -> FieldValue {
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let items = split_inline_list(inner)
            .into_iter()
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .collect();
        return FieldValue::List(items);
    }

    FieldValue::Scalar(unquote(strip_comment(value)))
}

/// Split `a, "b, c", d` on commas that are not inside quotes
fn split_inline_list(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                items.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&inner[start..]);
    items
}

fn strip_comment(value: &str) -> &str {
    if value.starts_with(['"', '\'']) {
        return value;
    }
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    }
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == b'"' && last == b'"' {
            let inner = &value[1..value.len() - 1];
            return inner.replace("\\\"", "\"").replace("\\\\", "\\");
        }
        if first == b'\'' && last == b'\'' {
            let inner = &value[1..value.len() - 1];
            return inner.replace("''", "'");
        }
    }
    value.to_string()
}
