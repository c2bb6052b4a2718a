//! Training rows and the numeric helpers used to
//! turn them into network inputs and targets.
use crate::{DataError, IndexError, ParseError};

use std::fs;
use std::io;
use std::path::Path;

/// An ordered collection of numeric rows.
///
/// Rows may differ in length; whether a row is long
/// enough for the designated columns is only checked
/// when it is sampled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    rows: Vec<Vec<f64>>,
}

impl DataSet {
    /// Creates a data set from already-parsed rows.
    ///
    /// # Examples
    /// ```
    /// use evolution::data::DataSet;
    ///
    /// let data = DataSet::from_rows(vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]]);
    /// assert_eq!(data.len(), 2);
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> DataSet {
        DataSet { rows }
    }

    /// Reads a delimited text file. Values may be separated
    /// by whitespace, commas or semicolons.
    ///
    /// Lines that are empty or contain a non-numeric token
    /// are skipped.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or
    /// cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<DataSet, DataError> {
        Ok(Self::parse(&read(path.as_ref())?))
    }

    /// Reads a delimited text file, rejecting malformed lines.
    ///
    /// # Errors
    /// Returns an error if the file does not exist, cannot
    /// be read, or contains a non-numeric token.
    pub fn load_strict(path: impl AsRef<Path>) -> Result<DataSet, DataError> {
        Self::parse_strict(&read(path.as_ref())?)
    }

    /// Parses delimited text, skipping blank and malformed lines.
    ///
    /// # Examples
    /// ```
    /// use evolution::data::DataSet;
    ///
    /// let data = DataSet::parse("1, 2, 3\n\nfour 5 6\n7;8;9\n");
    /// assert_eq!(data.rows(), &[vec![1.0, 2.0, 3.0], vec![7.0, 8.0, 9.0]]);
    /// ```
    pub fn parse(text: &str) -> DataSet {
        let mut rows = vec![];
        for (index, line) in text.lines().enumerate() {
            match parse_line(line) {
                Ok(row) if !row.is_empty() => rows.push(row),
                Ok(_) => {}
                Err(e) => log::debug!("skipping line {}: {}", index + 1, e),
            }
        }
        DataSet { rows }
    }

    /// Parses delimited text, skipping only blank lines.
    ///
    /// # Errors
    /// Returns the (1-based) number of the first line
    /// with a non-numeric token.
    ///
    /// # Examples
    /// ```
    /// use evolution::data::DataSet;
    ///
    /// assert!(DataSet::parse_strict("1 2\n3 4").is_ok());
    /// assert!(DataSet::parse_strict("1 2\n3 x").is_err());
    /// ```
    pub fn parse_strict(text: &str) -> Result<DataSet, DataError> {
        let mut rows = vec![];
        for (index, line) in text.lines().enumerate() {
            let row = parse_line(line).map_err(|source| DataError::Parse {
                line: index + 1,
                source,
            })?;
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Ok(DataSet { rows })
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the data set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns all rows in order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Returns the row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

fn read(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataError::NotFound(path.to_path_buf()),
        _ => DataError::Io(e),
    })
}

/// Splits a line on whitespace, commas and semicolons
/// and parses every token as a number. A blank line
/// yields an empty vector.
///
/// # Errors
/// Returns the first token that is not a number.
///
/// # Examples
/// ```
/// use evolution::data::parse_line;
///
/// assert_eq!(parse_line("0.5, -1;2  3").unwrap(), vec![0.5, -1.0, 2.0, 3.0]);
/// assert!(parse_line("").unwrap().is_empty());
/// assert_eq!(parse_line("1 two").unwrap_err().token, "two");
/// ```
pub fn parse_line(line: &str) -> Result<Vec<f64>, ParseError> {
    line.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| ParseError {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Copies the values at `columns` out of `row`, in the
/// order the columns are listed.
///
/// # Errors
/// Returns an error if any column lies outside the row.
///
/// # Examples
/// ```
/// use evolution::data::extract_columns;
///
/// let row = [1.0, 2.0, 3.0];
/// assert_eq!(extract_columns(&row, &[2, 0]).unwrap(), vec![3.0, 1.0]);
/// assert!(extract_columns(&row, &[3]).is_err());
/// ```
pub fn extract_columns(row: &[f64], columns: &[usize]) -> Result<Vec<f64>, IndexError> {
    columns
        .iter()
        .map(|&column| {
            row.get(column).copied().ok_or(IndexError {
                column,
                row_len: row.len(),
            })
        })
        .collect()
}

/// Sum of the absolute component-wise differences
/// between predicted and expected outputs.
///
/// Both slices must have the same length; callers check
/// this before scoring.
///
/// # Examples
/// ```
/// use evolution::data::deviation;
///
/// assert_eq!(deviation(&[1.0, 0.0], &[0.5, 0.5]), 1.0);
/// ```
pub fn deviation(predicted: &[f64], expected: &[f64]) -> f64 {
    debug_assert_eq!(predicted.len(), expected.len());
    predicted
        .iter()
        .zip(expected)
        .map(|(p, e)| (p - e).abs())
        .sum()
}
