use super::xml_driver::normalize_line_endings;
use crate::errors::MalformedXml;
use quick_xml::escape::resolve_predefined_entity;
use std::borrow::Cow;
use std::collections::HashMap;

/// Nesting limit when one entity's text references another.
const MAX_EXPANSION_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntityValue {
    /// Literal replacement text, references not yet expanded
    Internal(String),
    /// `SYSTEM`/`PUBLIC` entity; never fetched, its references expand to nothing
    External,
}

/// General entities declared in a document's internal DTD subset.
///
/// Parameter entities and every other markup declaration are skipped.
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: HashMap<String, EntityValue>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Records the `<!ENTITY name "value">` declarations found in the content of
    /// a `<!DOCTYPE ...>` declaration. The first declaration of a name wins.
    pub fn declare_from_doctype(&mut self, doctype: &str) -> Result<(), MalformedXml> {
        let bytes = doctype.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            let rest = &bytes[pos..];
            if rest.starts_with(b"<!--") {
                pos += find(&rest[4..], b"-->")
                    .map(|end| 4 + end + 3)
                    .ok_or_else(|| invalid("unterminated comment"))?;
            } else if rest.starts_with(b"<!ENTITY") {
                pos = self.parse_entity(doctype, pos + b"<!ENTITY".len())?;
            } else if matches!(rest[0], b'"' | b'\'') {
                pos = skip_quoted(bytes, pos)?;
            } else {
                pos += 1;
            }
        }
        Ok(())
    }

    /// Returns the fully expanded text of `name`, or `None` if it was never declared.
    pub fn expand(&self, name: &str) -> Result<Option<String>, MalformedXml> {
        match self.entities.get(name) {
            None => Ok(None),
            Some(EntityValue::External) => Ok(Some(String::new())),
            Some(EntityValue::Internal(value)) => {
                let mut out = String::with_capacity(value.len());
                self.expand_into(value, &mut out, 0, name)?;
                Ok(Some(out))
            }
        }
    }

    fn expand_into(
        &self,
        value: &str,
        out: &mut String,
        depth: usize,
        origin: &str,
    ) -> Result<(), MalformedXml> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(MalformedXml::RecursiveEntity(origin.to_string()));
        }
        let mut rest = value;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let semi = after
                .find(';')
                .ok_or_else(|| invalid("reference without ';' in entity value"))?;
            let reference = &after[..semi];

            if let Some(code) = reference.strip_prefix('#') {
                out.push(parse_char_ref(code)?);
            } else if let Some(text) = resolve_predefined_entity(reference) {
                out.push_str(text);
            } else {
                match self.entities.get(reference) {
                    Some(EntityValue::Internal(nested)) => {
                        self.expand_into(nested, out, depth + 1, origin)?
                    }
                    Some(EntityValue::External) => {}
                    None => return Err(MalformedXml::UndefinedEntity(reference.to_string())),
                }
            }
            rest = &after[semi + 1..];
        }
        out.push_str(rest);
        Ok(())
    }

    /// Parses one declaration starting just after `<!ENTITY`; returns the position after `>`.
    fn parse_entity(&mut self, doctype: &str, start: usize) -> Result<usize, MalformedXml> {
        let bytes = doctype.as_bytes();
        let mut pos = skip_ws(bytes, start);
        if pos == start {
            return Err(invalid("expected whitespace after <!ENTITY"));
        }

        if bytes.get(pos) == Some(&b'%') {
            return skip_declaration(bytes, pos);
        }

        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            return Err(invalid("missing entity name"));
        }
        let name = &doctype[name_start..pos];
        pos = skip_ws(bytes, pos);

        let value = match bytes.get(pos) {
            Some(b'"') | Some(b'\'') => {
                let end = skip_quoted(bytes, pos)?;
                let literal = Cow::Borrowed(&doctype[pos + 1..end - 1]);
                pos = end;
                EntityValue::Internal(normalize_line_endings(literal).into_owned())
            }
            _ if bytes[pos..].starts_with(b"SYSTEM") || bytes[pos..].starts_with(b"PUBLIC") => {
                EntityValue::External
            }
            _ => return Err(invalid(&format!("missing value for entity {name}"))),
        };

        self.entities.entry(name.to_string()).or_insert(value);
        skip_declaration(bytes, pos)
    }
}

fn parse_char_ref(code: &str) -> Result<char, MalformedXml> {
    let parsed = match code.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => code.parse::<u32>(),
    };
    parsed
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| invalid(&format!("bad character reference &#{code};")))
}

fn invalid(reason: &str) -> MalformedXml {
    MalformedXml::InvalidEntityDeclaration(reason.to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Returns the position just past the closing quote of the literal at `pos`.
fn skip_quoted(bytes: &[u8], pos: usize) -> Result<usize, MalformedXml> {
    let quote = bytes[pos];
    bytes[pos + 1..]
        .iter()
        .position(|&b| b == quote)
        .map(|len| pos + 1 + len + 1)
        .ok_or_else(|| invalid("unterminated literal"))
}

/// Returns the position just past the `>` closing the current declaration.
fn skip_declaration(bytes: &[u8], mut pos: usize) -> Result<usize, MalformedXml> {
    while pos < bytes.len() {
        match bytes[pos] {
            b'>' => return Ok(pos + 1),
            b'"' | b'\'' => pos = skip_quoted(bytes, pos)?,
            _ => pos += 1,
        }
    }
    Err(invalid("unterminated declaration"))
}

#[inline]
fn skip_ws(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\r') {
        pos += 1;
    }
    pos
}

#[inline]
fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}
