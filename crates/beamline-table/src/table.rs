//! Table loading and interpolated lookup.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::TableError;
use crate::header::scan_fields;

/// An immutable numeric table.
///
/// Columns are stored contiguously. Column 0 is the domain and is strictly
/// increasing; lookups interpolate linearly between the two bracketing
/// rows and clamp to the edge rows outside the domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: String,
    header: Vec<String>,
    fields: IndexMap<String, f64>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Read and parse the table at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path.display().to_string(), &text)
    }

    /// Parse table text. `name` identifies the table in diagnostics.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, TableError> {
        let mut header = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut in_header = true;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if let Some(comment) = line.strip_prefix('#') {
                if in_header {
                    header.push(comment.trim().to_string());
                }
                continue;
            }
            if line.is_empty() {
                continue;
            }
            in_header = false;

            let row = parse_row(line, line_no)?;
            if columns.is_empty() {
                if row.len() < 2 {
                    return Err(TableError::Parse {
                        line: line_no,
                        reason: format!("need at least 2 columns, found {}", row.len()),
                    });
                }
                columns = vec![Vec::new(); row.len()];
            } else if row.len() != columns.len() {
                return Err(TableError::Parse {
                    line: line_no,
                    reason: format!("expected {} columns, found {}", columns.len(), row.len()),
                });
            }
            if let Some(&prev) = columns[0].last() {
                if row[0] <= prev {
                    return Err(TableError::Parse {
                        line: line_no,
                        reason: format!(
                            "first column must be strictly increasing ({} after {prev})",
                            row[0]
                        ),
                    });
                }
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        if columns.is_empty() {
            return Err(TableError::Empty);
        }
        let fields = scan_fields(header.iter().map(String::as_str));
        Ok(Self {
            name: name.into(),
            header,
            fields,
            columns,
        })
    }

    /// Identifier given at load time (the path for loaded tables).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header lines with the leading `#` removed.
    pub fn header_lines(&self) -> &[String] {
        &self.header
    }

    /// Numeric metadata `name` from a `name: value` or `name = value`
    /// header entry.
    pub fn header_field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Every numeric header entry, in order of appearance.
    pub fn header_fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.columns[0].len()
    }

    /// Number of columns, including the domain column.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The values of `column`, or `None` if it does not exist.
    pub fn column(&self, column: usize) -> Option<&[f64]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    /// First and last domain values.
    pub fn domain(&self) -> (f64, f64) {
        let xs = &self.columns[0];
        (xs[0], xs[xs.len() - 1])
    }

    /// Interpolated value of column 1 at `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        interpolate(&self.columns[0], &self.columns[1], x)
    }

    /// Interpolated value of `column` at `x`, or `None` if the column does
    /// not exist. Column 0 returns `x` clamped to the domain.
    pub fn value_at_column(&self, x: f64, column: usize) -> Option<f64> {
        let ys = self.columns.get(column)?;
        Some(interpolate(&self.columns[0], ys, x))
    }
}

fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>, TableError> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .map(|word| match word.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(TableError::Parse {
                line: line_no,
                reason: format!("non-finite value '{word}'"),
            }),
            Err(_) => Err(TableError::Parse {
                line: line_no,
                reason: format!("not a number: '{word}'"),
            }),
        })
        .collect()
}

/// Linear interpolation over strictly increasing `xs`, clamped at the ends.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // First index with xs[i] >= x; 1..=last because of the checks above.
    let hi = xs.partition_point(|&k| k < x);
    if xs[hi] == x {
        return ys[hi];
    }
    let lo = hi - 1;
    let f = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + f * (ys[hi] - ys[lo])
}
