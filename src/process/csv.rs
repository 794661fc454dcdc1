// src/process/csv.rs
//
// Lenient delimited-text parser. Never fails: malformed quoting is absorbed by
// best-effort accumulation, and fully blank rows are dropped as they close.

use crate::process::table::Table;
use tracing::debug;

/// Field separator, picked once per document from its first non-blank line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    /// Semicolon only when it strictly outnumbers comma; ties go to comma.
    pub fn detect(first_line: &str) -> Self {
        let commas = first_line.matches(',').count();
        let semis = first_line.matches(';').count();
        if semis > commas {
            Delimiter::Semicolon
        } else {
            Delimiter::Comma
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    Quoted,
}

/// Input character class, with one character of lookahead for `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Quote,
    DoubledQuote,
    Delimiter,
    Newline,
    Other,
}

impl CharClass {
    fn of(c: char, next: Option<char>, sep: char) -> Self {
        match c {
            '"' if next == Some('"') => CharClass::DoubledQuote,
            '"' => CharClass::Quote,
            '\n' => CharClass::Newline,
            c if c == sep => CharClass::Delimiter,
            _ => CharClass::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Append the current character to the field.
    Append,
    /// Append one literal `"` and consume the lookahead quote too.
    AppendQuote,
    EndField,
    EndRow,
    Skip,
}

impl ScanState {
    fn step(self, class: CharClass) -> (ScanState, Action) {
        match (self, class) {
            // only the first quote of `""` is consumed; the second one is
            // re-read inside the quoted state
            (ScanState::Unquoted, CharClass::Quote | CharClass::DoubledQuote) => {
                (ScanState::Quoted, Action::Skip)
            }
            (ScanState::Unquoted, CharClass::Delimiter) => (ScanState::Unquoted, Action::EndField),
            (ScanState::Unquoted, CharClass::Newline) => (ScanState::Unquoted, Action::EndRow),
            (ScanState::Unquoted, CharClass::Other) => (ScanState::Unquoted, Action::Append),
            (ScanState::Quoted, CharClass::DoubledQuote) => (ScanState::Quoted, Action::AppendQuote),
            (ScanState::Quoted, CharClass::Quote) => (ScanState::Unquoted, Action::Skip),
            (ScanState::Quoted, CharClass::Delimiter | CharClass::Newline | CharClass::Other) => {
                (ScanState::Quoted, Action::Append)
            }
        }
    }
}

/// Convert CRLF and lone CR to LF.
fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Skip lines that are blank after trimming, up to the first real line.
fn skip_leading_blank_lines(mut text: &str) -> &str {
    while let Some((line, rest)) = text.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        text = rest;
    }
    text
}

/// Trim every field and keep the row only if something is left.
fn finish_row(row: Vec<String>, rows: &mut Vec<Vec<String>>) {
    let trimmed: Vec<String> = row.iter().map(|f| f.trim().to_string()).collect();
    if trimmed.iter().any(|f| !f.is_empty()) {
        rows.push(trimmed);
    }
}

/// Parse raw delimited text into a header and data rows.
pub fn parse_table(raw: &str) -> Table {
    let normalized = normalize_line_endings(raw);
    let text = normalized.strip_prefix('\u{feff}').unwrap_or(&normalized);
    let text = skip_leading_blank_lines(text);

    let first_line = text.split('\n').next().unwrap_or("");
    let delimiter = Delimiter::detect(first_line);
    let sep = delimiter.as_char();
    debug!(?delimiter, "detected delimiter");

    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut state = ScanState::Unquoted;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let class = CharClass::of(c, chars.peek().copied(), sep);
        let (next, action) = state.step(class);
        state = next;
        match action {
            Action::Append => field.push(c),
            Action::AppendQuote => {
                field.push('"');
                chars.next();
            }
            Action::EndField => row.push(std::mem::take(&mut field)),
            Action::EndRow => {
                row.push(std::mem::take(&mut field));
                finish_row(std::mem::take(&mut row), &mut rows);
            }
            Action::Skip => {}
        }
    }
    // no trailing newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        finish_row(row, &mut rows);
    }

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    Table {
        header,
        rows: rows.collect(),
    }
}
