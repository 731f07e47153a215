//! Column extraction from line-oriented plaintext tables
//!
//! A table is read as physical lines. Logical rows start at line `start`
//! (1-indexed) and every `step`-th line after that is taken, which covers
//! catalogues whose records span several lines. Columns are 1-indexed
//! whitespace-delimited tokens of the selected lines.

use tracing::debug;

use super::error::{CatalogueError, CatalogueResult};

/// One requested column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub index: usize, // 1-indexed token position
    pub name: String, // label carried into the table
}

impl ColumnSpec {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: format!("col{index}"),
        }
    }

    pub fn named(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// Row and column selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueQuery {
    pub columns: Vec<ColumnSpec>,
    pub start: usize, // first line, 1-indexed
    pub step: usize, // physical lines per logical row
}

impl CatalogueQuery {
    /// Unnamed columns from 1-indexed numbers
    pub fn new(columns: &[usize], start: usize, step: usize) -> Self {
        Self {
            columns: columns.iter().map(|&c| ColumnSpec::new(c)).collect(),
            start,
            step,
        }
    }

    fn validate(&self) -> CatalogueResult<()> {
        if self.start == 0 {
            return Err(CatalogueError::InvalidStart);
        }
        if self.step == 0 {
            return Err(CatalogueError::InvalidStep);
        }
        if let Some(bad) = self.columns.iter().find(|c| c.index == 0) {
            return Err(CatalogueError::InvalidColumn { column: bad.index });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Named numeric columns, aligned by row index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogueTable {
    pub columns: Vec<Column>,
}

impl CatalogueTable {
    /// Number of rows (all columns have the same length)
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        let header: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "{}", header.join(","))?;

        for row in 0..self.rows() {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| c.values[row].to_string())
                .collect();
            writeln!(out, "{}", cells.join(","))?;
        }
        Ok(())
    }
}

/// Parse the selected rows and columns of `text`.
///
/// Fails on the first missing or non-numeric token; there are no partial
/// results.
pub fn parse_table(text: &str, query: &CatalogueQuery) -> CatalogueResult<CatalogueTable> {
    query.validate()?;

    // (1-indexed line number, line) for every selected row
    let rows: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .skip(query.start - 1)
        .step_by(query.step)
        .map(|(i, line)| (i + 1, line))
        .collect();

    debug!(rows = rows.len(), columns = query.columns.len(), "parsing catalogue rows");

    let mut columns = Vec::with_capacity(query.columns.len());
    for spec in &query.columns {
        let mut values = Vec::with_capacity(rows.len());
        for &(line_no, line) in &rows {
            values.push(parse_cell(line, line_no, spec.index)?);
        }
        columns.push(Column {
            name: spec.name.clone(),
            values,
        });
    }

    Ok(CatalogueTable { columns })
}

fn parse_cell(line: &str, line_no: usize, column: usize) -> CatalogueResult<f64> {
    let token = line
        .split_whitespace()
        .nth(column - 1)
        .ok_or(CatalogueError::MissingColumn {
            line: line_no,
            column,
        })?;

    token.parse::<f64>().map_err(|source| CatalogueError::ParseFloat {
        line: line_no,
        column,
        token: token.to_string(),
        source,
    })
}
