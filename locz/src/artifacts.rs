//! The three generated file kinds: key enumeration, per-language resource
//! document and per-project accessor module.

use std::{
    borrow::Cow,
    io::{BufRead, Write},
};

use indoc::indoc;
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use crate::{
    error::{Error, Result},
    escape::escape,
    traits::Artifact,
    types::ResourceEntry,
};

const GENERATED_BANNER: &str = indoc! {"
    // <auto-generated>
    //     This code was generated by locz from a translation table.
    //     Changes to this file will be lost when the table is regenerated.
    // </auto-generated>
"};

/// C# `enum` listing every key of one table, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDocument {
    pub namespace: String,
    pub name: String,
    pub extension: String,
    pub keys: Vec<String>,
}

impl EnumDocument {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            extension: extension.into(),
            keys: Vec::new(),
        }
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }
}

impl Artifact for EnumDocument {
    fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut content = String::from(GENERATED_BANNER);
        content.push_str(&format!("namespace {};\n\n", self.namespace));
        content.push_str(&format!("public enum {}\n{{\n", self.name));
        for key in &self.keys {
            content.push_str(&format!("    {},\n", key));
        }
        content.push_str("}\n");

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

/// `.resx`-style XML document holding the values of one language column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDocument {
    pub base_name: String,
    pub language: String,
    pub extension: String,
    pub entries: Vec<ResourceEntry>,
}

impl ResourceDocument {
    pub fn new(
        base_name: impl Into<String>,
        language: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            language: language.into(),
            extension: extension.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry; the value is stored raw and escaped on output.
    pub fn push_entry(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ResourceEntry {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Reads the entries of a generated document back, unescaping values.
    pub fn read_entries<R: BufRead>(reader: R) -> Result<Vec<ResourceEntry>> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut entries = Vec::new();
        let mut current: Option<ResourceEntry> = None;
        let mut in_value = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"data" => {
                    current = Some(ResourceEntry {
                        key: data_name(e)?,
                        value: String::new(),
                    });
                }
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"value" => {
                    in_value = current.is_some();
                }
                Ok(Event::Text(e)) if in_value => {
                    if let Some(entry) = current.as_mut() {
                        entry.value.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::CData(e)) if in_value => {
                    if let Some(entry) = current.as_mut() {
                        entry.value.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::End(ref e)) if e.name().as_ref() == b"value" => in_value = false,
                Ok(Event::End(ref e)) if e.name().as_ref() == b"data" => match current.take() {
                    Some(entry) => entries.push(entry),
                    None => return Err(Error::InvalidResource("unexpected </data>".to_string())),
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        if current.is_some() {
            return Err(Error::InvalidResource("unterminated <data> element".to_string()));
        }
        Ok(entries)
    }
}

fn data_name(e: &BytesStart) -> Result<String> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        if attr.key.as_ref() == b"name" {
            return Ok(attr.unescape_value()?.into_owned());
        }
    }
    Err(Error::InvalidResource("data element missing 'name'".to_string()))
}

impl Artifact for ResourceDocument {
    fn file_name(&self) -> String {
        format!("{}.{}.{}", self.base_name, self.language, self.extension)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for entry in &self.entries {
            let mut data = BytesStart::new("data");
            data.push_attribute(("name", entry.key.as_str()));
            data.push_attribute(("xml:space", "preserve"));

            xml_writer.write_event(Event::Text(BytesText::new("  ")))?;
            xml_writer.write_event(Event::Start(data))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n    ")))?;
            xml_writer.write_event(Event::Start(BytesStart::new("value")))?;
            let escaped: Cow<str> = escape(&entry.value);
            xml_writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
            xml_writer.write_event(Event::End(BytesEnd::new("value")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n  ")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

/// Per-project C# helper exposing `Get` lookups over `IStringLocalizer`.
///
/// Only ever written when absent, so a hand-edited copy survives every later
/// run. The flip side: a stale copy is never refreshed either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorModule {
    pub namespace: String,
    pub file_name: String,
}

impl AccessorModule {
    pub fn new(namespace: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            file_name: file_name.into(),
        }
    }

    /// Class name: the file name without its extension.
    pub fn class_name(&self) -> &str {
        self.file_name
            .split_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name)
    }
}

impl Artifact for AccessorModule {
    fn file_name(&self) -> String {
        self.file_name.clone()
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let content = format!(
            indoc! {"
            using Microsoft.Extensions.Localization;

            namespace {namespace};

            public static class {class}
            {{
                public static string Get(this IStringLocalizer localizer, Enum key, params object[] args) =>
                    localizer.Get(key.ToString(), args);

                public static string Get(this IStringLocalizer localizer, string key, params object[] args) =>
                    localizer[key, args];
            }}
            "},
            namespace = self.namespace,
            class = self.class_name(),
        );

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}
