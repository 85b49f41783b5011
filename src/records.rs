use anyhow::Result;
use serde::de::{value::MapDeserializer, DeserializeOwned};
use tracing::debug;

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io,
    path::Path,
    rc::Rc,
};

use crate::error::Error;

/// One data row: a mapping from column name to (trimmed) value.
///
/// Records loaded from a file remember where they came from, so that
/// reports can say which line holds a bad value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, String>,
    origin: Option<(Rc<Path>, u64)>,
}

impl Record {
    /// Returns the value of `column`, if this record has it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Returns the file this record was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.origin.as_ref().map(|(path, _)| path.as_ref())
    }

    /// Returns the 1-based line number this record was loaded from, if any.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        self.origin.as_ref().map(|(_, line)| *line)
    }

    /// Describes where this record came from, for error messages.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.origin {
            Some((path, line)) => format!("{}:{line}", path.display()),
            None => "record".to_string(),
        }
    }

    /// Deserializes this record into a typed row.
    ///
    /// Columns the row type doesn't name are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ratings::Record;
    /// #[derive(serde::Deserialize)]
    /// struct Row {
    ///     name: String,
    /// }
    ///
    /// let record = Record::from_iter([("name", "iphone"), ("price", "999")]);
    /// let row: Row = record.parse().unwrap();
    /// assert_eq!(row.name, "iphone");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if a column the row type needs is missing, or
    /// its value can't be parsed.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        let pairs = self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        T::deserialize(MapDeserializer::<_, serde::de::value::Error>::new(pairs)).map_err(|e| {
            Error::Value {
                location: self.location(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            origin: None,
        }
    }
}

/// Reads records from the CSV files at `paths`, in order.
///
/// Every file must have a header row naming the same set of columns as the
/// first file, although the columns may appear in a different order.
///
/// # Errors
///
/// Returns:
/// * [`Error::FileNotFound`] if a path does not exist
/// * [`Error::Format`] if a file is not a `.csv` file, has no header row,
///   repeats a column name, is not valid CSV, or has different columns from
///   the first file
/// * [`Error::Io`] if a file cannot be read
pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut expected: Option<(&Path, BTreeSet<String>)> = None;
    for path in paths {
        let path = path.as_ref();
        let (columns, rows) = read_csv(path)?;
        let (first, first_columns) = expected.get_or_insert_with(|| (path, columns.clone()));
        if *first_columns != columns {
            return Err(Error::Format {
                path: path.to_path_buf(),
                reason: format!(
                    "columns [{}] do not match [{}] in {}",
                    join(&columns),
                    join(first_columns),
                    first.display(),
                ),
            }
            .into());
        }
        records.extend(rows);
    }
    debug!(files = paths.len(), records = records.len(), "loaded records");
    Ok(records)
}

fn read_csv(path: &Path) -> Result<(BTreeSet<String>, Vec<Record>)> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(format_error(path, "not a CSV file").into());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();
    if headers.is_empty() {
        return Err(format_error(path, "missing header row").into());
    }
    if headers.iter().any(str::is_empty) {
        return Err(format_error(path, "empty column name in header row").into());
    }
    let columns: BTreeSet<String> = headers.iter().map(String::from).collect();
    if columns.len() != headers.len() {
        return Err(format_error(path, "duplicate column name in header row").into());
    }
    let source: Rc<Path> = Rc::from(path);
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| csv_error(path, e))?;
        let line = row.position().map_or(0, csv::Position::line);
        records.push(Record {
            fields: headers
                .iter()
                .zip(row.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            origin: Some((Rc::clone(&source), line)),
        });
    }
    debug!(path = %path.display(), rows = records.len(), "read CSV file");
    Ok((columns, records))
}

fn format_error(path: &Path, reason: &str) -> Error {
    Error::Format {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => Error::Format {
            path: path.to_path_buf(),
            reason,
        },
    }
}

fn join(columns: &BTreeSet<String>) -> String {
    columns.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
