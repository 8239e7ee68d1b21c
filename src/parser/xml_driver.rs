use super::dtd::EntityTable;
use super::tsv_handler::EventHandler;
use crate::errors::{MalformedXml, StreamError};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;
use std::io::BufRead;

/// Builds a quick-xml reader configured the way the driver expects.
///
/// Empty elements are expanded into start/end pairs and text is left untrimmed,
/// so `<COLUMN/>` and whitespace inside a COLUMN behave as written.
pub fn xml_reader<R: BufRead>(input: R) -> Reader<R> {
    let mut reader = Reader::from_reader(input);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = true;
    config.trim_text(false);
    reader
}

/// Streams every event of `reader` into `handler`, in document order.
///
/// Character data reaches the handler in the fragments the reader produces:
/// a text run, a CDATA section, or a single resolved character/entity reference.
/// Line breaks in text and CDATA are normalized to `\n`. Whitespace-only
/// fragments outside the document element are skipped.
///
/// General entities declared in the internal subset of `<!DOCTYPE>` are
/// expanded as one fragment each; markup inside their replacement text is
/// passed through as plain text.
///
/// Besides what quick-xml itself rejects, the end of input is checked for a
/// missing document element and for elements left open, and content after the
/// document element is refused.
///
/// # Errors
///
/// `Read` if the underlying reader fails, `Malformed` with a byte position for
/// any well-formedness violation, `Write` if the handler cannot write output.
pub fn drive<R: BufRead, H: EventHandler>(
    reader: &mut Reader<R>,
    handler: &mut H,
    buffer_capacity: usize,
) -> Result<(), StreamError> {
    let mut buf = Vec::with_capacity(buffer_capacity);
    let mut depth: usize = 0;
    let mut root_seen = false;
    let mut entities = EntityTable::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(quick_xml::Error::Io(e)) => return Err(StreamError::Read(e)),
            Err(e) => return Err(StreamError::malformed(reader.error_position(), e)),
        };

        match event {
            Event::Start(e) => {
                if depth == 0 && root_seen {
                    return Err(StreamError::malformed(
                        reader.buffer_position(),
                        MalformedXml::ContentAfterRoot,
                    ));
                }
                for attr in e.attributes() {
                    attr.map_err(|err| {
                        StreamError::malformed(reader.buffer_position(), quick_xml::Error::from(err))
                    })?;
                }
                depth += 1;
                root_seen = true;
                handler
                    .start_element(e.name().as_ref())
                    .map_err(StreamError::Write)?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                handler
                    .end_element(e.name().as_ref())
                    .map_err(StreamError::Write)?;
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| {
                    StreamError::malformed(reader.buffer_position(), quick_xml::Error::from(err))
                })?;
                let text = normalize_line_endings(text);
                if depth == 0 {
                    if !text.trim().is_empty() {
                        let reason = if root_seen {
                            MalformedXml::ContentAfterRoot
                        } else {
                            MalformedXml::ContentOutsideRoot
                        };
                        return Err(StreamError::malformed(reader.buffer_position(), reason));
                    }
                } else if !text.is_empty() {
                    handler.characters(&text).map_err(StreamError::Write)?;
                }
            }
            Event::CData(e) => {
                let text = e.decode().map_err(|err| {
                    StreamError::malformed(reader.buffer_position(), quick_xml::Error::from(err))
                })?;
                let text = normalize_line_endings(text);
                if depth == 0 {
                    return Err(StreamError::malformed(
                        reader.buffer_position(),
                        MalformedXml::ContentOutsideRoot,
                    ));
                }
                if !text.is_empty() {
                    handler.characters(&text).map_err(StreamError::Write)?;
                }
            }
            Event::GeneralRef(e) => {
                let resolved = resolve_reference(&e, &entities)
                    .map_err(|reason| StreamError::malformed(reader.buffer_position(), reason))?;
                if depth == 0 {
                    return Err(StreamError::malformed(
                        reader.buffer_position(),
                        MalformedXml::ContentOutsideRoot,
                    ));
                }
                handler.characters(&resolved).map_err(StreamError::Write)?;
            }
            Event::DocType(e) => {
                let doctype = e.decode().map_err(|err| {
                    StreamError::malformed(reader.buffer_position(), quick_xml::Error::from(err))
                })?;
                entities
                    .declare_from_doctype(&doctype)
                    .map_err(|reason| StreamError::malformed(reader.buffer_position(), reason))?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(StreamError::malformed(
            reader.buffer_position(),
            MalformedXml::NoRootElement,
        ));
    }
    if depth > 0 {
        return Err(StreamError::malformed(
            reader.buffer_position(),
            MalformedXml::UnclosedElements(depth),
        ));
    }
    Ok(())
}

/// Replaces `\r\n` and lone `\r` with `\n`, as an XML processor must.
pub(super) fn normalize_line_endings(text: Cow<'_, str>) -> Cow<'_, str> {
    if !text.contains('\r') {
        return text;
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Resolves `&#NN;`, `&#xHH;`, entities declared in the DOCTYPE and the
/// predefined entities to their text.
fn resolve_reference(
    reference: &BytesRef<'_>,
    entities: &EntityTable,
) -> Result<Cow<'static, str>, MalformedXml> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| MalformedXml::Syntax(quick_xml::Error::from(err)))?
    {
        return Ok(Cow::Owned(ch.to_string()));
    }
    let name = reference
        .decode()
        .map_err(|err| MalformedXml::Syntax(quick_xml::Error::from(err)))?;
    if let Some(text) = entities.expand(&name)? {
        return Ok(Cow::Owned(text));
    }
    resolve_predefined_entity(&name)
        .map(Cow::Borrowed)
        .ok_or_else(|| MalformedXml::UndefinedEntity(name.into_owned()))
}
