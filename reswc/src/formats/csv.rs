//! Reader for CSV translation tables.
//!
//! The reader only splits a table into rows of cells; it knows nothing about
//! ids, properties or languages. Column meaning is resolved by
//! [`crate::validator`].
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use serde::Serialize;

use crate::{error::Error, options::ColumnLayout};

const BOM: char = '\u{feff}';

/// One record of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    /// 1-based line the record starts on.
    pub line: u64,
    pub cells: Vec<String>,
}

impl RawRow {
    /// Cell at `index`, or an empty string past the end of a short row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A lazy, single-pass sequence of [`RawRow`]s.
///
/// With [`ColumnLayout::Named`] the first record is consumed as the header
/// and exposed through [`TableReader::header`]. An empty input yields no
/// header and no rows.
pub struct TableReader<R: Read> {
    header: Option<Vec<String>>,
    records: csv::StringRecordsIntoIter<R>,
    first: bool,
}

impl TableReader<DecodeReaderBytes<File, Vec<u8>>> {
    /// Opens a table file, decoding UTF-16 exports to UTF-8 when a BOM says so.
    pub fn open<P: AsRef<Path>>(path: P, layout: ColumnLayout) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding_rs::UTF_8))
            .bom_override(true)
            .build(file);
        Self::new(decoder, layout)
    }
}

impl<R: Read> TableReader<R> {
    pub fn new(reader: R, layout: ColumnLayout) -> Result<Self, Error> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut table = Self {
            header: None,
            records: rdr.into_records(),
            first: true,
        };

        if layout == ColumnLayout::Named {
            if let Some(row) = table.next_row()? {
                table.header = Some(row.cells);
            }
        }
        Ok(table)
    }

    /// Header cells, when the layout has a header and the table is not empty.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    fn next_row(&mut self) -> Result<Option<RawRow>, Error> {
        let Some(record) = self.records.next() else {
            return Ok(None);
        };
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();

        if self.first {
            self.first = false;
            if let Some(cell) = cells.first_mut() {
                if cell.starts_with(BOM) {
                    *cell = cell.trim_start_matches(BOM).to_string();
                }
            }
        }
        Ok(Some(RawRow { line, cells }))
    }
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<RawRow, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl TableReader<io::Cursor<Vec<u8>>> {
    /// Reads a table held in memory.
    pub fn from_text(text: &str, layout: ColumnLayout) -> Result<Self, Error> {
        Self::new(io::Cursor::new(text.as_bytes().to_vec()), layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_header_and_rows() {
        let text = "Id,Property,en-US,fr-FR\nGreeting,Text,Hello,Bonjour\nFarewell,Text,Bye,Salut\n";
        let mut table = TableReader::from_text(text, ColumnLayout::Named).unwrap();
        assert_eq!(
            table.header().unwrap(),
            ["Id", "Property", "en-US", "fr-FR"]
        );

        let first = table.next().unwrap().unwrap();
        assert_eq!(first.line, 2);
        assert_eq!(first.cells, vec!["Greeting", "Text", "Hello", "Bonjour"]);

        let second = table.next().unwrap().unwrap();
        assert_eq!(second.line, 3);
        assert!(table.next().is_none());
    }

    #[test]
    fn test_empty_table() {
        let mut table = TableReader::from_text("", ColumnLayout::Named).unwrap();
        assert!(table.header().is_none());
        assert!(table.next().is_none());
    }

    #[test]
    fn test_header_only() {
        let mut table = TableReader::from_text("Id,Property,en-US\n", ColumnLayout::Named).unwrap();
        assert_eq!(table.header().unwrap().len(), 3);
        assert!(table.next().is_none());
    }

    #[test]
    fn test_positional_has_no_header() {
        let text = "Greeting,Text,Hello\n";
        let mut table = TableReader::from_text(text, ColumnLayout::Positional).unwrap();
        assert!(table.header().is_none());
        let row = table.next().unwrap().unwrap();
        assert_eq!(row.line, 1);
        assert_eq!(row.cell(2), "Hello");
        assert_eq!(row.cell(7), "");
    }

    #[test]
    fn test_quoted_multiline_cell_keeps_start_line() {
        let text = "Id,Property,en-US\n\"Multi\",Text,\"line one\nline two\"\nNext,Text,After\n";
        let rows: Vec<RawRow> = TableReader::from_text(text, ColumnLayout::Named)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells[2], "line one\nline two");
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn test_bom_is_stripped_from_header() {
        let text = "\u{feff}Id,Property,en-US\nA,Text,a\n";
        let table = TableReader::from_text(text, ColumnLayout::Named).unwrap();
        assert_eq!(table.header().unwrap()[0], "Id");
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let text = "Id,Property,en-US,fr-FR\nGreeting,Text\n";
        let mut table = TableReader::from_text(text, ColumnLayout::Named).unwrap();
        let row = table.next().unwrap().unwrap();
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cell(3), "");
    }
}
