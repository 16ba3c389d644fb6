//! Tabular result of reading a worksheet

use std::fmt;

/// Rows of resolved cell text.
///
/// Columns are positional: the k-th cell of a sheet row lands in column k,
/// whatever its reference. The column set grows to fit the widest row seen
/// so far; a narrower row leaves its trailing columns unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, adding columns named `"0"`, `"1"`, ... as needed
    pub fn push_row(&mut self, values: Vec<String>) {
        while self.columns.len() < values.len() {
            self.columns.push(self.columns.len().to_string());
        }
        self.rows.push(values);
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row`, `col`; `None` if outside the table or unset for
    /// that row
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// The set values of a row
    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Rows padded to the full column count, unset cells as `None`
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&str>>> + '_ {
        self.rows.iter().map(move |row| {
            (0..self.columns.len())
                .map(|col| row.get(col).map(String::as_str))
                .collect()
        })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join("\t"))?;
        for row in self.rows() {
            let line: Vec<&str> = row.into_iter().map(|v| v.unwrap_or("")).collect();
            writeln!(f, "{}", line.join("\t"))?;
        }
        Ok(())
    }
}
