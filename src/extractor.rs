//! Record-at-a-time descriptor extractor.
//!
//! Lines are pushed through a small state machine one at a time. A record
//! is handed back as soon as it is complete, either because its `};`
//! terminator was seen or because the next declaration started. Whatever is
//! still open at end of input is settled by [`Extractor::finish`] according
//! to the [`TrailingPolicy`].

use std::io::{self, BufRead, Write};
use std::mem;

use tracing::{debug, trace, warn};

use crate::error::ExtractError;
use crate::line_kind::{LineKind, classify};
use crate::record::{DEFAULT_DELIMITER, Record};

/// What to do with a record that is still open when input runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingPolicy {
    /// Discard the open record and any pending fragment.
    #[default]
    Drop,
    /// Emit the open record as-is, with a pending fragment as its last field.
    EmitPartial,
}

/// Extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Separator placed between fields on each output line.
    pub delimiter: char,
    pub trailing: TrailingPolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            trailing: TrailingPolicy::default(),
        }
    }
}

/// Counts reported after a streaming run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractSummary {
    pub lines: usize,
    pub records: usize,
}

/// Scan state for one pass over descriptor text.
#[derive(Debug)]
pub struct Extractor {
    options: ExtractOptions,
    current: Option<Record>,
    pending: String,
    scanning: bool,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            current: None,
            pending: String::new(),
            scanning: true,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// True while inside a record body (between `--`/start and `};`).
    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// Feed one physical line. Returns a record if this line completed one.
    pub fn push_line(&mut self, line: &str) -> Option<Record> {
        self.apply(classify(line))
    }

    /// Apply an already classified line to the scan state.
    pub fn apply(&mut self, kind: LineKind) -> Option<Record> {
        if kind.needs_scanning() && !self.scanning {
            trace!(kind = kind.name(), "skipped outside record body");
            return None;
        }
        trace!(kind = kind.name(), "line");

        match kind {
            LineKind::Blank => None,
            LineKind::Separator => {
                self.scanning = true;
                None
            }
            LineKind::Terminator => {
                if !self.pending.is_empty() {
                    let last = mem::take(&mut self.pending);
                    self.append_field(last);
                }
                self.scanning = false;
                let done = self.current.take();
                if let Some(record) = &done {
                    debug!(name = record.name(), fields = record.len(), "record terminated");
                }
                done
            }
            LineKind::Declaration { name } => {
                if !self.pending.is_empty() {
                    debug!(fragment = %self.pending, "discarding fragment before declaration");
                    self.pending.clear();
                }
                let previous = self.current.replace(Record::new(name));
                if let Some(record) = &previous {
                    debug!(name = record.name(), fields = record.len(), "record closed by next declaration");
                }
                previous
            }
            LineKind::EmbeddedStruct { text } => {
                let field = self.take_pending_with(&text);
                self.append_field(field);
                None
            }
            LineKind::QuotedString { contents } => {
                let field = self.take_pending_with(&contents);
                self.append_field(field);
                None
            }
            LineKind::TrailingComma { primary, extra } => {
                let field = self.take_pending_with(&primary);
                self.append_field(field);
                for token in extra {
                    self.append_field(token);
                }
                None
            }
            LineKind::Continuation { fragment } => {
                self.pending.push_str(&fragment);
                None
            }
        }
    }

    /// End of input: settle the record still open, if any.
    pub fn finish(mut self) -> Option<Record> {
        let mut open = self.current.take()?;
        match self.options.trailing {
            TrailingPolicy::Drop => {
                warn!(name = open.name(), fields = open.len(), "dropping unterminated record");
                None
            }
            TrailingPolicy::EmitPartial => {
                if !self.pending.is_empty() {
                    open.push_field(mem::take(&mut self.pending));
                }
                debug!(name = open.name(), fields = open.len(), "emitting unterminated record");
                Some(open)
            }
        }
    }

    /// Prefix the pending fragment (if any) onto `value` and clear it.
    fn take_pending_with(&mut self, value: &str) -> String {
        let mut field = mem::take(&mut self.pending);
        field.push_str(value);
        field
    }

    fn append_field(&mut self, field: String) {
        match &mut self.current {
            Some(record) => record.push_field(field),
            None => debug!(%field, "no open record; field ignored"),
        }
    }
}

/// Extract every complete record from `lines`.
pub fn extract<I, S>(lines: I, options: ExtractOptions) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = Extractor::new(options);
    let mut records = Vec::new();

    for line in lines {
        records.extend(extractor.push_line(line.as_ref()));
    }
    records.extend(extractor.finish());

    records
}

/// Render records as output text, one newline-terminated line per record.
pub fn render(records: &[Record], delimiter: char) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line(delimiter));
        out.push('\n');
    }
    out
}

/// Stream descriptor text from `reader` to `writer`.
///
/// Each record is written as soon as it is complete, so the input is never
/// held in memory as a whole.
pub fn extract_to_writer<R, W>(
    mut reader: R,
    writer: &mut W,
    options: ExtractOptions,
) -> Result<ExtractSummary, ExtractError>
where
    R: BufRead,
    W: Write,
{
    let mut extractor = Extractor::new(options);
    let mut summary = ExtractSummary::default();
    let mut buf = Vec::new();

    while let Some(line) = read_line_lossy(&mut reader, &mut buf).map_err(ExtractError::Read)? {
        summary.lines += 1;
        if let Some(record) = extractor.push_line(&line) {
            write_record(writer, &record, options.delimiter)?;
            summary.records += 1;
        }
    }

    if let Some(record) = extractor.finish() {
        write_record(writer, &record, options.delimiter)?;
        summary.records += 1;
    }

    writer.flush().map_err(ExtractError::Write)?;
    Ok(summary)
}

/// Read one line without its `\n` or `\r\n` ending. Returns `None` at end
/// of input.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read.
pub fn read_line_lossy<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

fn write_record<W: Write>(writer: &mut W, record: &Record, delimiter: char) -> Result<(), ExtractError> {
    writeln!(writer, "{}", record.to_line(delimiter)).map_err(ExtractError::Write)
}
