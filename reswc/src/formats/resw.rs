//! Support for the `.resw` resource format consumed by Windows App SDK apps.
//!
//! A `.resw` file is a ResX document: a `<root>` element holding four fixed
//! `<resheader>` entries followed by one `<data>` entry per resource. The
//! header strings are read by the platform tooling and are reproduced
//! verbatim.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;

use crate::{
    error::Error,
    traits::Parser,
    types::{ResourceEntry, ResourceTable},
};

pub const RESW_EXTENSION: &str = "resw";

pub const MIME_TYPE: &str = "text/microsoft-resx";
pub const VERSION: &str = "2.0";
pub const READER_TYPE: &str = "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";
pub const WRITER_TYPE: &str = "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

/// The fixed `<resheader>` block, in emission order.
pub const HEADERS: [(&str, &str); 4] = [
    ("resmimetype", MIME_TYPE),
    ("version", VERSION),
    ("reader", READER_TYPE),
    ("writer", WRITER_TYPE),
];

const INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReswEntry {
    pub name: String,
    pub value: String,
}

/// A parsed or to-be-written `.resw` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReswDocument {
    /// `(name, value)` of every `<resheader>`, in document order.
    pub headers: Vec<(String, String)>,
    pub entries: Vec<ReswEntry>,
}

impl Default for ReswDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ReswDocument {
    /// Creates an empty document carrying the standard header block.
    pub fn new() -> Self {
        Self {
            headers: HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ReswEntry {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Entry names in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

impl From<&ResourceTable> for ReswDocument {
    fn from(table: &ResourceTable) -> Self {
        let mut document = ReswDocument::new();
        for entry in &table.entries {
            document.add_entry(entry.id.as_str(), entry.value.as_str());
        }
        document
    }
}

impl ReswDocument {
    /// Converts back into a table for `language`, keeping entry order.
    pub fn into_table(self, language: impl Into<String>) -> ResourceTable {
        ResourceTable {
            language: language.into(),
            entries: self
                .entries
                .into_iter()
                .map(|entry| ResourceEntry {
                    id: entry.name.into(),
                    value: entry.value,
                })
                .collect(),
        }
    }
}

impl Parser for ReswDocument {
    /// Parse from any reader. Whitespace inside `<value>` is kept as is.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut headers = Vec::new();
        let mut entries = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.name().as_ref() == b"resheader" => {
                    let name = required_name(e, "resheader")?;
                    let value = read_value(&mut xml_reader, b"resheader")?;
                    headers.push((name, value));
                }
                Event::Start(ref e) if e.name().as_ref() == b"data" => {
                    let name = required_name(e, "data")?;
                    let value = read_value(&mut xml_reader, b"data")?;
                    entries.push(ReswEntry { name, value });
                }
                Event::Empty(ref e) if e.name().as_ref() == b"data" => {
                    let name = required_name(e, "data")?;
                    entries.push(ReswEntry {
                        name,
                        value: String::new(),
                    });
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(ReswDocument { headers, entries })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', INDENT);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;

        for (name, value) in &self.headers {
            let mut elem = BytesStart::new("resheader");
            elem.push_attribute(("name", name.as_str()));
            xml_writer.write_event(Event::Start(elem))?;
            write_value(&mut xml_writer, value)?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for entry in &self.entries {
            let mut elem = BytesStart::new("data");
            elem.push_attribute(("name", entry.name.as_str()));
            elem.push_attribute(("xml:space", "preserve"));
            xml_writer.write_event(Event::Start(elem))?;
            write_value(&mut xml_writer, &entry.value)?;
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn write_value<W: Write>(xml_writer: &mut Writer<W>, value: &str) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new("value")))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))?;
    xml_writer.write_event(Event::End(BytesEnd::new("value")))?;
    Ok(())
}

fn required_name(e: &BytesStart, tag: &str) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == b"name" {
            return Ok(attr.unescape_value()?.into_owned());
        }
    }
    Err(Error::invalid_resource(format!("{tag} tag missing 'name'")))
}

/// Reads the text of the `<value>` child of the element `parent`, consuming
/// events up to and including the parent's end tag.
fn read_value<R: BufRead>(xml_reader: &mut Reader<R>, parent: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    let mut in_value = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"value" => in_value = true,
            Event::End(ref e) if e.name().as_ref() == b"value" => in_value = false,
            Event::Text(ref e) if in_value => value.push_str(&e.unescape()?),
            Event::CData(ref e) if in_value => value.push_str(&String::from_utf8_lossy(e)),
            Event::End(ref e) if e.name().as_ref() == parent => break,
            Event::Eof => return Err(Error::invalid_resource("Unexpected EOF")),
            _ => {}
        }
        buf.clear();
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_write_exact_layout() {
        let mut document = ReswDocument::new();
        document.add_entry("Main_Greeting.Text", "Hello");
        let text = document.to_text().unwrap();

        let expected = format!(
            indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <root>
                <resheader name="resmimetype">
                    <value>text/microsoft-resx</value>
                </resheader>
                <resheader name="version">
                    <value>2.0</value>
                </resheader>
                <resheader name="reader">
                    <value>{}</value>
                </resheader>
                <resheader name="writer">
                    <value>{}</value>
                </resheader>
                <data name="Main_Greeting.Text" xml:space="preserve">
                    <value>Hello</value>
                </data>
            </root>
            "#},
            READER_TYPE, WRITER_TYPE
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_escapes_markup_characters() {
        let mut document = ReswDocument::new();
        document.add_entry("Main_Tag.Text", "<b>Fish & Chips</b>");
        let text = document.to_text().unwrap();
        assert!(text.contains("<value>&lt;b&gt;Fish &amp; Chips&lt;/b&gt;</value>"));

        let parsed = ReswDocument::from_str(&text).unwrap();
        assert_eq!(parsed.entries[0].value, "<b>Fish & Chips</b>");
    }

    #[test]
    fn test_parse_headers_and_entries() {
        let xml = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <root>
              <resheader name="resmimetype"><value>text/microsoft-resx</value></resheader>
              <data name="A.Text" xml:space="preserve"><value>  padded  </value></data>
              <data name="B.Text" xml:space="preserve">
                <value></value>
                <comment>ignored</comment>
              </data>
              <data name="C"/>
            </root>
        "#};
        let document = ReswDocument::from_str(xml).unwrap();
        assert_eq!(document.header("resmimetype"), Some(MIME_TYPE));
        assert_eq!(document.keys().collect::<Vec<_>>(), vec!["A.Text", "B.Text", "C"]);
        assert_eq!(document.entries[0].value, "  padded  ");
        assert_eq!(document.entries[1].value, "");
        assert_eq!(document.entries[2].value, "");
    }

    #[test]
    fn test_missing_name_attribute() {
        let xml = "<root><data><value>x</value></data></root>";
        let err = ReswDocument::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn test_truncated_document() {
        let xml = "<root><data name=\"A\"><value>x</value>";
        assert!(ReswDocument::from_str(xml).is_err());
    }

    #[test]
    fn test_table_round_trip_keeps_order() {
        let mut document = ReswDocument::new();
        document.add_entry("Z_Last.Text", "z");
        document.add_entry("A_First.Text", "a");
        let table = ReswDocument::from_str(&document.to_text().unwrap())
            .unwrap()
            .into_table("en-US");
        let ids: Vec<_> = table.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["Z_Last.Text", "A_First.Text"]);
    }
}
