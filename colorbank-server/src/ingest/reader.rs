//! Row reader for staged uploads
//!
//! Uploads are CSV-shaped but carry their columns `;`-separated inside the
//! first CSV field of each line: `id;name;hex;red;green;blue;decimal`. The
//! reader honours CSV quoting, keeps only that first field and splits it.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column separator inside the first CSV field
pub const COLUMN_SEPARATOR: char = ';';

/// One non-blank record of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based position among the non-blank records of the file
    pub number: usize,
    pub columns: Vec<String>,
}

/// A record the CSV layer could not read, numbered like [`Row`]
#[derive(Debug, thiserror::Error)]
#[error("row {row}: {source}")]
pub struct MalformedRow {
    pub row: usize,
    #[source]
    pub source: csv::Error,
}

/// Iterates the rows of an upload in file order
pub struct RowReader<R: Read> {
    records: csv::StringRecordsIntoIter<BufReader<R>>,
    seen: usize,
}

impl RowReader<File> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read> RowReader<R> {
    /// Wrap a reader, dropping a leading UTF-8 byte-order mark.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut reader = BufReader::new(inner);
        if reader.fill_buf()?.starts_with(UTF8_BOM) {
            reader.consume(UTF8_BOM.len());
        }

        let records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        Ok(Self { records, seen: 0 })
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row, MalformedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(source) => {
                    return Some(Err(MalformedRow {
                        row: self.seen + 1,
                        source,
                    }))
                }
            };

            let first = record.get(0).unwrap_or("");
            if record.len() <= 1 && first.is_empty() {
                continue;
            }

            self.seen += 1;
            let columns = first.split(COLUMN_SEPARATOR).map(str::to_owned).collect();

            return Some(Ok(Row {
                number: self.seen,
                columns,
            }));
        }
    }
}
