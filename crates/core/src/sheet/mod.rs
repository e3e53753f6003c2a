pub mod fields;

use std::path::Path;

use crate::error::{Error, Result};

const BOM: char = '\u{feff}';

/// One data record of the metadata table, keyed by (trimmed) header.
/// Keys are unique and keep header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Build a row from `(header, value)` pairs. A repeated header keeps its
    /// first position but takes the later value.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row::default();
        for (k, v) in pairs {
            row.insert(k.into(), v.into());
        }
        row
    }

    fn insert(&mut self, key: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Exact header lookup.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse delimited text into rows. The first record is the header row.
///
/// Never fails: unbalanced quotes simply keep the scanner in quoted mode until
/// the next quote (or end of input). Blank lines are dropped; short records
/// are padded with empty values and long records lose their excess fields.
pub fn parse(text: &str) -> Vec<Row> {
    let mut records = split_records(text).into_iter();

    let headers: Vec<String> = match records.next() {
        Some(first) => first
            .into_iter()
            .enumerate()
            .map(|(i, h)| match h.strip_prefix(BOM) {
                Some(rest) if i == 0 => rest.trim().to_string(),
                _ => h.trim().to_string(),
            })
            .collect(),
        None => return Vec::new(),
    };

    records
        .filter(|record| has_content(record))
        .map(|record| {
            let mut values = record.into_iter();
            Row::from_pairs(
                headers
                    .iter()
                    .map(|h| (h.clone(), values.next().unwrap_or_default())),
            )
        })
        .collect()
}

/// Read a metadata table from disk and parse it. Invalid UTF-8 is replaced
/// rather than rejected.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::CsvNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    Ok(parse(&String::from_utf8_lossy(&bytes)))
}

/// A record is kept if it has more than one field, or a single non-empty one.
fn has_content(record: &[String]) -> bool {
    record.len() > 1 || record.first().is_some_and(|f| !f.is_empty())
}

/// Character-level scan into raw records (header row included).
fn split_records(text: &str) -> Vec<Vec<String>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => record.push(std::mem::take(&mut field)),
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut field));
                let done = std::mem::take(&mut record);
                if has_content(&done) {
                    records.push(done);
                }
            }
            _ => field.push(c),
        }
    }

    // Unterminated last line
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        if has_content(&record) {
            records.push(record);
        }
    }

    records
}
