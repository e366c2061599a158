// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML `<userinfo>` reader and writer

use crate::auxtree::{AuxRecord, AuxTree};
use crate::codec::{CodecError, CodecResult};
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::{Cursor, Write as IoWrite};

const USERINFO: &[u8] = b"userinfo";
const AUXILIARY: &[u8] = b"auxiliary";
const STRUCTURE: &[u8] = b"structure";
const VOLUME: &[u8] = b"volume";
const SETUP: &[u8] = b"setup";
const GDML: &[u8] = b"gdml";
const DEFINE: &[u8] = b"define";

/// A named value declared in a document's `<define>` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub value: String,
    /// Unit expression of a `<quantity>`, empty otherwise
    pub unit: String,
}

/// Parse the `<auxiliary>` elements of a document's `<userinfo>` block.
///
/// Auxiliaries attached to volumes live outside `<userinfo>` and are skipped.
pub fn read_userinfo(xml: &str) -> CodecResult<AuxTree> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut tree = AuxTree::new();
    let mut stack: Vec<AuxRecord> = Vec::new();
    let mut in_userinfo = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == USERINFO => in_userinfo = true,
            Event::End(e) if e.name().as_ref() == USERINFO => in_userinfo = false,
            Event::Start(e) if in_userinfo && e.name().as_ref() == AUXILIARY => {
                let mut record = parse_auxiliary(&e)?;
                record.children = Some(Vec::new());
                stack.push(record);
            }
            Event::Empty(e) if in_userinfo && e.name().as_ref() == AUXILIARY => {
                attach(&mut stack, &mut tree, parse_auxiliary(&e)?);
            }
            Event::End(e) if in_userinfo && e.name().as_ref() == AUXILIARY => {
                if let Some(record) = stack.pop() {
                    attach(&mut stack, &mut tree, record);
                }
            }
            Event::Eof if !stack.is_empty() => return Err(unclosed("auxiliary")),
            Event::Eof if in_userinfo => return Err(unclosed("userinfo")),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(tree)
}

fn unclosed(element: &str) -> CodecError {
    CodecError::Xml(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(
        element.to_string(),
    )))
}

fn attach(stack: &mut [AuxRecord], tree: &mut AuxTree, record: AuxRecord) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(record),
        None => tree.push(record),
    }
}

fn parse_auxiliary(element: &BytesStart) -> CodecResult<AuxRecord> {
    let mut record = AuxRecord::default();
    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"auxtype" => record.tag = value,
            b"auxvalue" => record.value = value,
            b"auxunit" => record.unit = value,
            _ => {}
        }
    }
    Ok(record)
}

/// Names of the logical volumes declared in `<structure>`, in document order
pub fn read_volume_names(xml: &str) -> CodecResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut names = Vec::new();
    let mut in_structure = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == STRUCTURE => in_structure = true,
            Event::End(e) if e.name().as_ref() == STRUCTURE => in_structure = false,
            Event::Start(e) | Event::Empty(e) if in_structure && e.name().as_ref() == VOLUME => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"name" {
                        names.push(attr.unescape_value()?.into_owned());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

/// Constants, variables and quantities of the `<define>` block, in document
/// order
pub fn read_defines(xml: &str) -> CodecResult<Vec<Definition>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut definitions = Vec::new();
    let mut in_define = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == DEFINE => in_define = true,
            Event::End(e) if e.name().as_ref() == DEFINE => in_define = false,
            Event::Start(e) | Event::Empty(e) if in_define => {
                if matches!(
                    e.name().as_ref(),
                    b"constant" | b"variable" | b"quantity"
                ) {
                    definitions.push(parse_definition(&e)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(definitions)
}

fn parse_definition(element: &BytesStart) -> CodecResult<Definition> {
    let mut definition = Definition {
        name: String::new(),
        value: String::new(),
        unit: String::new(),
    };
    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"name" => definition.name = value,
            b"value" => definition.value = value,
            b"unit" => definition.unit = value,
            _ => {}
        }
    }
    Ok(definition)
}

/// Render `tree` as a standalone `<userinfo>` element
pub fn write_userinfo(tree: &AuxTree, pretty: bool) -> CodecResult<String> {
    let mut writer = if pretty {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    write_userinfo_events(&mut writer, tree)?;

    into_string(writer.into_inner().into_inner())
}

/// Replace the `<userinfo>` block of a GDML document with `tree`.
///
/// Without an existing block, one is inserted before `<setup>` (or before
/// the closing `</gdml>` tag). Everything else is copied through unchanged.
pub fn embed_userinfo(document: &str, tree: &AuxTree) -> CodecResult<String> {
    let mut reader = Reader::from_str(document);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut skipping = false;
    let mut written = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) if e.name().as_ref() == USERINFO => {
                skipping = true;
                continue;
            }
            Event::End(e) if e.name().as_ref() == USERINFO => {
                skipping = false;
                if !written {
                    write_userinfo_events(&mut writer, tree)?;
                    written = true;
                }
                continue;
            }
            Event::Empty(e) if e.name().as_ref() == USERINFO => {
                if !written {
                    write_userinfo_events(&mut writer, tree)?;
                    written = true;
                }
                continue;
            }
            Event::Start(e) | Event::Empty(e) if !written && e.name().as_ref() == SETUP => {
                write_userinfo_events(&mut writer, tree)?;
                written = true;
            }
            Event::End(e) if !written && e.name().as_ref() == GDML => {
                write_userinfo_events(&mut writer, tree)?;
                written = true;
            }
            Event::Eof if skipping => return Err(unclosed("userinfo")),
            Event::Eof => break,
            _ => {}
        }
        if !skipping {
            writer.write_event(event)?;
        }
    }

    into_string(writer.into_inner().into_inner())
}

fn write_userinfo_events<W: IoWrite>(writer: &mut Writer<W>, tree: &AuxTree) -> CodecResult<()> {
    if tree.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("userinfo")))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("userinfo")))?;
    for record in tree {
        write_record(writer, record)?;
    }
    writer.write_event(Event::End(BytesEnd::new("userinfo")))?;
    Ok(())
}

fn write_record<W: IoWrite>(writer: &mut Writer<W>, record: &AuxRecord) -> CodecResult<()> {
    let mut element = BytesStart::new("auxiliary");
    element.push_attribute(("auxtype", record.tag.as_str()));
    element.push_attribute(("auxvalue", record.value.as_str()));
    if !record.unit.is_empty() {
        element.push_attribute(("auxunit", record.unit.as_str()));
    }

    match &record.children {
        Some(children) => {
            writer.write_event(Event::Start(element))?;
            for child in children {
                write_record(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new("auxiliary")))?;
        }
        None => writer.write_event(Event::Empty(element))?,
    }
    Ok(())
}

fn into_string(bytes: Vec<u8>) -> CodecResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| CodecError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
