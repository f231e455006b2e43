//! Turns a parsed wallet document back into records.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{Result, WalletError};
use crate::record::{generate_uuid, Field, Record, RecordClass};

use super::names::*;

pub(super) fn read_document(text: &str, config: &CodecConfig) -> Result<Vec<Record>> {
    let options = config.parsing_options()?;
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let doc = Document::parse_with_options(text, options)?;

    let root = doc.root_element();
    let mut records = Vec::new();

    // Records may sit anywhere below the document element, not only under <records>.
    for element in root
        .descendants()
        .filter(|n| *n != root && n.has_tag_name(RECORD))
    {
        let class = element.attribute(CLASS_ATTR);
        let record = match class.and_then(RecordClass::parse_wire) {
            Some(RecordClass::Card) => read_card(element)?,
            Some(RecordClass::Note) => read_note(element)?,
            None => {
                debug!(
                    record_class = class.unwrap_or("<missing>"),
                    uuid = attr(element, UUID_ATTR),
                    "skipping record with unknown class"
                );
                continue;
            }
        };
        records.push(record);
    }

    Ok(records)
}

fn read_card(element: Node<'_, '_>) -> Result<Record> {
    let uuid = read_uuid(element);
    let modified = read_modified(element, &uuid)?;

    let fields = element
        .descendants()
        .filter(|n| n.has_tag_name(FIELD))
        .map(read_field)
        .collect();

    let note = element
        .descendants()
        .find(|n| *n != element && n.has_tag_name(NOTE))
        .map(text_content)
        .unwrap_or_default();

    Ok(Record::card(
        uuid,
        modified,
        attr(element, NAME_ATTR),
        attr(element, TYPE_ATTR),
        attr(element, PICTURE_ATTR),
        fields,
        note,
        read_favorite(element),
    ))
}

fn read_note(element: Node<'_, '_>) -> Result<Record> {
    let uuid = read_uuid(element);
    let modified = read_modified(element, &uuid)?;

    Ok(Record::note(
        uuid,
        modified,
        attr(element, NAME_ATTR),
        attr(element, TYPE_ATTR),
        attr(element, PICTURE_ATTR),
        text_content(element),
        read_favorite(element),
    ))
}

fn read_field(element: Node<'_, '_>) -> Field {
    Field::new(
        attr(element, NAME_ATTR),
        attr(element, TYPE_ATTR),
        attr(element, VALUE_ATTR),
    )
}

/// Missing or empty identifiers are replaced with a fresh one on every read.
fn read_uuid(element: Node<'_, '_>) -> String {
    match element.attribute(UUID_ATTR) {
        Some(uuid) if !uuid.is_empty() => uuid.to_string(),
        _ => {
            let uuid = generate_uuid();
            debug!(uuid = %uuid, "generated identifier for record without one");
            uuid
        }
    }
}

/// A bad timestamp fails the whole load, unlike a bad record class.
fn read_modified(element: Node<'_, '_>, uuid: &str) -> Result<u64> {
    let raw = attr(element, MODIFIED_ATTR);
    raw.parse::<u64>().map_err(|e| {
        WalletError::Format(format!(
            "record {}: invalid modified timestamp '{}': {}",
            uuid, raw, e
        ))
    })
}

fn read_favorite(element: Node<'_, '_>) -> bool {
    attr(element, FAVORITE_ATTR).eq_ignore_ascii_case("true")
}

fn attr<'a>(element: Node<'a, '_>, name: &str) -> &'a str {
    element.attribute(name).unwrap_or("")
}

/// Concatenated text of all descendant text nodes.
fn text_content(element: Node<'_, '_>) -> String {
    element
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
