//! Reply decoding: rowspan-compressed table reconstruction
//!
//! The reply document carries a row-oriented table of `<r>` elements whose
//! `<c>` cells are either numeric values (`v` attribute), labels (`l`), or
//! labels spanning several consecutive rows (`l` plus a rowspan count `r`).
//! A spanned label is written into the current row and the following
//! rows at the same column position, reproducing the service's vertical
//! merge-cell compression.

use cdc_wonder_diagnostics::{Result, WonderError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt;

/// Labels of the three fixed measure columns
pub const MEASURE_LABELS: [&str; 3] = ["Deaths", "Population", "Crude Rate Per 100,000"];

/// One decoded table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A numeric value
    Number(f64),
    /// A group label, or numeric text the service replaced with a sentinel
    /// such as "Suppressed", "Unreliable" or "Not Applicable"
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// A rectangular table with one header per column
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

/// Immutable reply from the WONDER endpoint.
///
/// Holds the raw reply text and the column labels captured from the
/// request's grouping; decoding happens on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct WonderResponse {
    xml: String,
    column_labels: Vec<String>,
}

impl WonderResponse {
    pub fn new(xml: impl Into<String>, column_labels: Vec<String>) -> Self {
        Self {
            xml: xml.into(),
            column_labels,
        }
    }

    /// Raw reply text
    pub fn as_xml(&self) -> &str {
        &self.xml
    }

    /// Decode the reply into rectangular rows with all rowspans resolved
    pub fn to_rows(&self) -> Result<Vec<Vec<Cell>>> {
        decode_rows(&self.xml)
    }

    /// Decode the reply into a labeled table: the request's grouping labels
    /// followed by the three fixed measure columns
    pub fn to_table(&self) -> Result<Table> {
        let rows = self.to_rows()?;
        let mut headers = self.column_labels.clone();
        headers.extend(MEASURE_LABELS.iter().map(ToString::to_string));
        if let Some(first) = rows.first() {
            if first.len() != headers.len() {
                return Err(WonderError::malformed(format!(
                    "expected {} columns ({} groupings + {} measures), reply has {}",
                    headers.len(),
                    self.column_labels.len(),
                    MEASURE_LABELS.len(),
                    first.len()
                )));
            }
        }
        Ok(Table { headers, rows })
    }

    /// Decode the raw reply text with a caller-supplied function
    pub fn decode_with<T>(&self, f: impl FnOnce(&str) -> T) -> T {
        f(&self.xml)
    }
}

/// Single pass over the reply document, expanding spanned labels downward
/// and coercing numeric cells.
fn decode_rows(xml: &str) -> Result<Vec<Vec<Cell>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut row_index = 0usize;
    let mut in_row = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"r" => {
                    in_row = true;
                    ensure_row(&mut rows, row_index);
                }
                b"c" if in_row => push_cell(&mut rows, row_index, &e)?,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"r" => {
                    ensure_row(&mut rows, row_index);
                    row_index += 1;
                }
                b"c" if in_row => push_cell(&mut rows, row_index, &e)?,
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"r" {
                    in_row = false;
                    row_index += 1;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(WonderError::malformed(format!("XML parse error: {e}")));
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(width) = rows.first().map(Vec::len) {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(WonderError::malformed(format!(
                    "ragged table: row {index} has {} cells, expected {width}",
                    row.len()
                )));
            }
        }
    }
    Ok(rows)
}

fn push_cell(rows: &mut Vec<Vec<Cell>>, row_index: usize, cell: &BytesStart<'_>) -> Result<()> {
    let mut value: Option<String> = None;
    let mut label: Option<String> = None;
    let mut span: Option<usize> = None;

    for attr in cell.attributes() {
        let attr = attr.map_err(|e| WonderError::malformed(format!("bad cell attribute: {e}")))?;
        let text = attr
            .unescape_value()
            .map_err(|e| WonderError::malformed(format!("bad cell attribute value: {e}")))?
            .into_owned();
        match attr.key.as_ref() {
            b"v" => value = Some(text),
            b"l" => label = Some(text),
            b"r" => {
                span = Some(text.parse().map_err(|_| {
                    WonderError::malformed(format!("non-numeric rowspan '{text}'"))
                })?);
            }
            _ => {}
        }
    }

    if let Some(text) = value {
        rows[row_index].push(coerce_number(text));
    } else if let Some(text) = label {
        match span {
            None => rows[row_index].push(Cell::Text(text)),
            Some(count) => {
                for offset in 0..count {
                    ensure_row(rows, row_index + offset);
                    rows[row_index + offset].push(Cell::Text(text.clone()));
                }
            }
        }
    } else {
        return Err(WonderError::malformed("cell without value or label"));
    }
    Ok(())
}

// Numbers arrive with thousands separators; text that still fails to parse
// is one of the service's confidentiality sentinels and kept verbatim.
fn coerce_number(text: String) -> Cell {
    match text.replace(',', "").parse::<f64>() {
        Ok(number) => Cell::Number(number),
        Err(_) => Cell::Text(text),
    }
}

fn ensure_row(rows: &mut Vec<Vec<Cell>>, index: usize) {
    while rows.len() <= index {
        rows.push(Vec::new());
    }
}
