//! Builds the wallet XML document.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::error::{Result, WalletError};
use crate::record::{Field, Record, RecordBody};

use super::names::*;

/// Render `records` into an indented document held in memory.
pub(super) fn write_document(records: &[Record], indent: usize) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    writer.write_event(Event::Start(BytesStart::new(WALLET)))?;
    writer.write_event(Event::Start(BytesStart::new(RECORDS)))?;

    for record in records {
        write_record(&mut writer, record)?;
    }

    writer.write_event(Event::End(BytesEnd::new(RECORDS)))?;
    writer.write_event(Event::End(BytesEnd::new(WALLET)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_record(writer: &mut Writer<Vec<u8>>, record: &Record) -> Result<()> {
    let mut start = BytesStart::new(RECORD);
    push_attribute(&mut start, CLASS_ATTR, record.class().wire_name())?;
    push_attribute(&mut start, UUID_ATTR, &record.uuid)?;
    push_attribute(&mut start, NAME_ATTR, &record.name)?;
    push_attribute(&mut start, TYPE_ATTR, &record.record_type)?;
    push_attribute(&mut start, MODIFIED_ATTR, &record.modified.to_string())?;
    push_attribute(&mut start, PICTURE_ATTR, &record.picture)?;
    push_attribute(&mut start, FAVORITE_ATTR, if record.favorite { "true" } else { "false" })?;
    writer.write_event(Event::Start(start))?;

    match &record.body {
        RecordBody::Card { fields, note } => {
            if !fields.is_empty() {
                writer.write_event(Event::Start(BytesStart::new(FIELDS)))?;
                for field in fields {
                    write_field(writer, field)?;
                }
                writer.write_event(Event::End(BytesEnd::new(FIELDS)))?;
            }

            writer.write_event(Event::Start(BytesStart::new(NOTE)))?;
            write_text(writer, note)?;
            writer.write_event(Event::End(BytesEnd::new(NOTE)))?;
        }
        // Note text goes straight under <record>, unlike the card's <note> child.
        RecordBody::Note { text } => write_text(writer, text)?,
    }

    writer.write_event(Event::End(BytesEnd::new(RECORD)))?;
    Ok(())
}

fn write_field(writer: &mut Writer<Vec<u8>>, field: &Field) -> Result<()> {
    let mut element = BytesStart::new(FIELD);
    push_attribute(&mut element, NAME_ATTR, &field.name)?;
    push_attribute(&mut element, TYPE_ATTR, &field.field_type)?;
    push_attribute(&mut element, VALUE_ATTR, &field.value)?;
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

/// Text is always written, even when empty, so the writer keeps the closing
/// tag on the same line and no indentation ends up inside the content.
fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    let escaped = escape(text, false)?;
    writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
    Ok(())
}

fn push_attribute(element: &mut BytesStart<'_>, key: &'static str, value: &str) -> Result<()> {
    let escaped = escape(value, true)?;
    element.push_attribute(Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    });
    Ok(())
}

/// Escape markup characters. Inside attributes whitespace control characters
/// become character references so attribute-value normalisation keeps them.
/// Characters XML 1.0 cannot carry at all are rejected.
pub(super) fn escape(value: &str, in_attribute: bool) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\'' if in_attribute => out.push_str("&apos;"),
            '\t' if in_attribute => out.push_str("&#9;"),
            '\n' if in_attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                return Err(WalletError::Format(format!(
                    "character U+{:04X} cannot be stored in XML",
                    c as u32
                )));
            }
            c => out.push(c),
        }
    }
    Ok(out)
}
