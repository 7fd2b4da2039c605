//! Forward-only reader over delimited translation tables.
//!
//! The reader knows nothing about headers: it hands out trimmed rows in order
//! and the generator decides what row 0 means.

use std::{io::Read, path::Path};

use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::{
    config::LoczConfig,
    error::{Error, Result},
    fs::FileSystem,
};

/// One row of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based line on which the row starts.
    pub line: u64,
    pub fields: Vec<String>,
}

impl TableRow {
    /// First field, or `""` for a row without fields.
    pub fn key(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct TableReader<R: Read> {
    inner: csv::Reader<R>,
    record: csv::StringRecord,
}

impl<'fs> TableReader<Box<dyn Read + 'fs>> {
    /// Opens `path` through `fs`.
    ///
    /// UTF-16 input with a byte-order mark is transcoded to UTF-8; everything
    /// else is passed through unchanged.
    pub fn open<F: FileSystem + ?Sized>(
        fs: &'fs F,
        path: &Path,
        config: &LoczConfig,
    ) -> Result<Self> {
        let file = fs.open(path).map_err(|e| Error::unreadable(path, e))?;
        let decoder = DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(file);
        Ok(Self::from_reader(
            Box::new(decoder) as Box<dyn Read + 'fs>,
            config,
        ))
    }
}

impl<R: Read> TableReader<R> {
    /// Wraps any reader.
    pub fn from_reader(reader: R, config: &LoczConfig) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(config.delimiter_byte())
            .quoting(true)
            .double_quote(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self {
            inner,
            record: csv::StringRecord::new(),
        }
    }

    /// Next row, or `None` once the input is exhausted.
    pub fn next_row(&mut self) -> Result<Option<TableRow>> {
        if !self.inner.read_record(&mut self.record)? {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line()).unwrap_or_default();
        Ok(Some(TableRow {
            line,
            fields: self.record.iter().map(str::to_string).collect(),
        }))
    }
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<TableRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use std::io::Cursor;

    fn rows(input: &str) -> Vec<TableRow> {
        TableReader::from_reader(Cursor::new(input.to_string()), &LoczConfig::default())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    fn fields(input: &str) -> Vec<Vec<String>> {
        rows(input).into_iter().map(|r| r.fields).collect()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let parsed = fields("Key,en,fr\nhello,Hello,Bonjour\nbye,Bye,Au revoir\n");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], vec!["Key", "en", "fr"]);
        assert_eq!(parsed[1], vec!["hello", "Hello", "Bonjour"]);
        assert_eq!(parsed[2], vec!["bye", "Bye", "Au revoir"]);
    }

    #[test]
    fn test_trims_fields() {
        let parsed = fields("Key , en-US ,fr-FR\n  hello ,  Hello  , Bonjour\n");
        assert_eq!(parsed[0], vec!["Key", "en-US", "fr-FR"]);
        assert_eq!(parsed[1], vec!["hello", "Hello", "Bonjour"]);
    }

    #[test]
    fn test_quoted_fields_keep_delimiters_and_quotes() {
        let parsed = fields("Key,en\ngreeting,\"Hello, \"\"friend\"\"\"\n");
        assert_eq!(parsed[1], vec!["greeting", "Hello, \"friend\""]);
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let parsed = rows("Key,en\nmultiline,\"one\ntwo\"\nnext,Next\n");
        assert_eq!(parsed[1].fields, vec!["multiline", "one\ntwo"]);
        assert_eq!(parsed[2].fields, vec!["next", "Next"]);
    }

    #[test]
    fn test_skips_blank_lines() {
        let parsed = rows("Key,en\n\nhello,Hello\n\n\nbye,Bye\n");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].line, 1);
        assert_eq!(parsed[1].key(), "hello");
        assert_eq!(parsed[2].key(), "bye");
    }

    #[test]
    fn test_rows_may_vary_in_length() {
        let parsed = fields("Key,en,fr\nshort,Only\n");
        assert_eq!(parsed[1], vec!["short", "Only"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let mut reader = TableReader::from_reader(Cursor::new(""), &LoczConfig::default());
        assert!(reader.next_row().unwrap().is_none());
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn test_custom_delimiter() {
        let config = LoczConfig::new().with_delimiter(';');
        let parsed: Vec<_> = TableReader::from_reader(Cursor::new("Key;en\na;b,c\n"), &config)
            .map(|r| r.unwrap().fields)
            .collect();
        assert_eq!(parsed[1], vec!["a", "b,c"]);
    }

    #[test]
    fn test_open_missing_file_is_unreadable_source() {
        let fs = MemoryFileSystem::new();
        let result = TableReader::open(&fs, Path::new("/nope.loc.csv"), &LoczConfig::default());
        assert!(matches!(result, Err(Error::UnreadableSource { .. })));
    }

    #[test]
    fn test_open_utf16_with_bom() {
        let text = "Key,en\nhello,Héllo\n";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let fs = MemoryFileSystem::new();
        fs.add_file("/t.loc.csv", bytes);

        let mut reader =
            TableReader::open(&fs, Path::new("/t.loc.csv"), &LoczConfig::default()).unwrap();
        let header = reader.next_row().unwrap().unwrap();
        assert_eq!(header.fields, vec!["Key", "en"]);
        let row = reader.next_row().unwrap().unwrap();
        assert_eq!(row.fields, vec!["hello", "Héllo"]);
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn test_open_utf8_with_bom() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/t.loc.csv", b"\xEF\xBB\xBFKey,en\nhello,Hello\n".to_vec());
        let mut reader =
            TableReader::open(&fs, Path::new("/t.loc.csv"), &LoczConfig::default()).unwrap();
        assert_eq!(reader.next_row().unwrap().unwrap().key(), "Key");
    }
}
