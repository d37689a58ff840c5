//! # desc-extract
//!
//! Flattens ASN.1 type descriptor tables, as found in asn1c-generated C
//! sources, into one colon-delimited line per table.
//!
//! ## Overview
//!
//! Input is usually the output of something like
//! `grep -A30 '^asn_TYPE_descriptor_t' *.c`, so tables are separated by
//! `--` lines. Each table becomes a [`Record`]:
//! - **Name**: the identifier after `asn_DEF_` on the declaration line
//! - **Fields**: every initializer in the table, in source order
//! - **Wrapped initializers**: fragments on lines without a trailing comma
//!   are glued onto the next field
//! - **Comments**: `/* ... */` is removed before anything else
//!
//! ## Example
//!
//! ```
//! use desc_extract::{ExtractOptions, extract};
//!
//! let source = "asn_TYPE_descriptor_t asn_DEF_Foo = {
//!     \"Foo\",
//!     \"XMLFoo\",
//! };";
//!
//! let records = extract(source.lines(), ExtractOptions::default());
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].to_string(), "Foo:Foo:XMLFoo");
//! ```

pub mod error;
pub mod extractor;
pub mod line_kind;
pub mod record;
pub mod scan_trace;

pub use error::ExtractError;
pub use extractor::{
    ExtractOptions, ExtractSummary, Extractor, TrailingPolicy, extract, extract_to_writer,
    read_line_lossy, render,
};
pub use line_kind::{LineKind, classify};
pub use record::{DEFAULT_DELIMITER, Record};
pub use scan_trace::{LineTrace, ScanTrace, extract_traced};
