//! Per-line trace of an extraction run.
//!
//! These types record how each physical input line was classified and
//! whether it took effect, which makes it easy to see why a field ended up
//! glued to its neighbour or why a record went missing.

use std::fmt;

use crate::extractor::{ExtractOptions, Extractor};
use crate::line_kind::classify;
use crate::record::Record;

/// How one input line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTrace {
    /// 1-based line number in the input.
    pub line_number: usize,
    /// Display name of the line's kind.
    pub kind: &'static str,
    /// True when the line was ignored because no record body was open.
    pub skipped: bool,
    /// Name of the record completed by this line, if any.
    pub completed: Option<String>,
}

/// Complete trace of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanTrace {
    /// One entry per input line, in order.
    pub lines: Vec<LineTrace>,
    /// Name of the open record settled at end of input, if any.
    pub trailing: Option<String>,
}

impl fmt::Display for ScanTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(f, "{:>5} {:<12}", line.line_number, line.kind)?;
            if line.skipped {
                write!(f, " (skipped)")?;
            }
            if let Some(name) = &line.completed {
                write!(f, " -> {name}")?;
            }
            writeln!(f)?;
        }
        if let Some(name) = &self.trailing {
            writeln!(f, "  EOF -> {name}")?;
        }
        Ok(())
    }
}

/// Extract records while capturing a [`ScanTrace`].
///
/// Produces the same records as [`crate::extract`].
pub fn extract_traced<I, S>(lines: I, options: ExtractOptions) -> (Vec<Record>, ScanTrace)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = Extractor::new(options);
    let mut records = Vec::new();
    let mut trace = ScanTrace::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let kind = classify(line.as_ref());
        let name = kind.name();
        let skipped = kind.needs_scanning() && !extractor.is_scanning();

        let done = extractor.apply(kind);
        trace.lines.push(LineTrace {
            line_number: idx + 1,
            kind: name,
            skipped,
            completed: done.as_ref().map(|r| r.name().to_string()),
        });
        records.extend(done);
    }

    if let Some(record) = extractor.finish() {
        trace.trailing = Some(record.name().to_string());
        records.push(record);
    }

    (records, trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{TrailingPolicy, extract};

    const TWO_RECORDS: &str = "asn_TYPE_descriptor_t asn_DEF_A = {\n\
                               \"a\",\n\
                               };\n\
                               \"stray\",\n\
                               --\n\
                               asn_TYPE_descriptor_t asn_DEF_B = {\n\
                               part\n\
                               \"b\",\n\
                               };";

    #[test]
    fn test_trace_has_one_entry_per_line() {
        let (_, trace) = extract_traced(TWO_RECORDS.lines(), ExtractOptions::default());
        assert_eq!(trace.lines.len(), 9);
        assert_eq!(trace.lines[0].line_number, 1);
        assert_eq!(trace.lines[8].line_number, 9);
    }

    #[test]
    fn test_trace_kinds() {
        let (_, trace) = extract_traced(TWO_RECORDS.lines(), ExtractOptions::default());
        let kinds: Vec<&str> = trace.lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                "DECLARATION",
                "STRING",
                "TERMINATOR",
                "STRING",
                "SEPARATOR",
                "DECLARATION",
                "CONTINUATION",
                "STRING",
                "TERMINATOR",
            ]
        );
    }

    #[test]
    fn test_trace_marks_skipped_lines() {
        let (_, trace) = extract_traced(TWO_RECORDS.lines(), ExtractOptions::default());
        let skipped: Vec<usize> = trace
            .lines
            .iter()
            .filter(|l| l.skipped)
            .map(|l| l.line_number)
            .collect();
        assert_eq!(skipped, vec![4]);
    }

    #[test]
    fn test_trace_marks_completions() {
        let (_, trace) = extract_traced(TWO_RECORDS.lines(), ExtractOptions::default());
        assert_eq!(trace.lines[2].completed.as_deref(), Some("A"));
        assert_eq!(trace.lines[8].completed.as_deref(), Some("B"));
        assert!(trace.lines[1].completed.is_none());
        assert!(trace.trailing.is_none());
    }

    #[test]
    fn test_traced_equivalence() {
        let options = ExtractOptions::default();
        let plain = extract(TWO_RECORDS.lines(), options);
        let (traced, _) = extract_traced(TWO_RECORDS.lines(), options);
        assert_eq!(plain, traced);
        assert_eq!(traced.len(), 2);
        assert_eq!(traced[1].fields(), ["B", "partb"]);
    }

    #[test]
    fn test_trace_trailing_partial() {
        let options = ExtractOptions {
            trailing: TrailingPolicy::EmitPartial,
            ..ExtractOptions::default()
        };
        let (records, trace) =
            extract_traced(["asn_TYPE_descriptor_t asn_DEF_Open = {", "x,"], options);
        assert_eq!(records.len(), 1);
        assert_eq!(trace.trailing.as_deref(), Some("Open"));
    }

    #[test]
    fn test_trace_display() {
        let (_, trace) = extract_traced(TWO_RECORDS.lines(), ExtractOptions::default());
        let text = trace.to_string();
        assert!(text.contains("    1 DECLARATION"));
        assert!(text.contains("    4 STRING       (skipped)"));
        assert!(text.contains("TERMINATOR   -> A"));
    }
}
