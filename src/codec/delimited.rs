// src/codec/delimited.rs

use thiserror::Error;

pub const BOM: char = '\u{feff}';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("the file has no usable lines")]
    EmptyInput,
}

/// Wraps a value in quotes, doubling any embedded quote. Empty values are
/// written as an empty, unquoted field.
pub fn encode_field(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    quote(value)
}

/// Header cells are always quoted.
pub fn encode_header(name: &str) -> String {
    quote(name)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn encode_row<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| encode_field(v.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line plus one line per row, joined with `\n`, no trailing newline.
pub fn encode_table<H, R, S>(headers: H, rows: R) -> String
where
    H: IntoIterator<Item = S>,
    R: IntoIterator<Item = Vec<String>>,
    S: AsRef<str>,
{
    let header = headers
        .into_iter()
        .map(|h| encode_header(h.as_ref()))
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header)
        .chain(rows.into_iter().map(encode_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One data line after tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    /// 1-based line number of the row's first physical line.
    pub line: usize,
    pub fields: Vec<String>,
    /// The row's text as it appeared in the input, for diagnostics.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    pub headers: Vec<String>,
    pub rows: Vec<DecodedRow>,
}

/// Splits `text` into a header row and data rows.
///
/// A leading byte-order mark is ignored and lines that are blank after
/// trimming are dropped. Newlines inside quotes belong to the field. Rows are
/// returned whatever their field count; callers decide what to do with
/// ragged rows.
pub fn decode(text: &str) -> Result<DecodedTable, CodecError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut lines = tokenize(text).into_iter();
    let header = lines.next().ok_or(CodecError::EmptyInput)?;
    let headers = header.fields.iter().map(|h| h.trim().to_string()).collect();

    Ok(DecodedTable {
        headers,
        rows: lines.collect(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

fn tokenize(text: &str) -> Vec<DecodedRow> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut raw = String::new();
    let mut state = State::Unquoted;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, state) {
            ('"', State::Quoted) if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
                raw.push_str("\"\"");
            }
            ('"', State::Quoted) => {
                state = State::Unquoted;
                raw.push(c);
            }
            ('"', State::Unquoted) => {
                state = State::Quoted;
                raw.push(c);
            }
            (',', State::Unquoted) => {
                fields.push(std::mem::take(&mut current));
                raw.push(c);
            }
            ('\r', State::Unquoted) if chars.peek() == Some(&'\n') => {}
            ('\n', State::Unquoted) => {
                fields.push(std::mem::take(&mut current));
                flush_row(&mut rows, &mut fields, &mut raw, row_start);
                line += 1;
                row_start = line;
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                current.push(c);
                raw.push(c);
            }
        }
    }

    fields.push(current);
    flush_row(&mut rows, &mut fields, &mut raw, row_start);
    rows
}

fn flush_row(rows: &mut Vec<DecodedRow>, fields: &mut Vec<String>, raw: &mut String, line: usize) {
    let fields = std::mem::take(fields);
    let raw = std::mem::take(raw);
    if raw.trim().is_empty() {
        return;
    }
    rows.push(DecodedRow { line, fields, raw });
}
