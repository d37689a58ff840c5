//! Line classification for descriptor source text.
//!
//! Descriptor tables look like this (comments and wrapping vary):
//! ```text
//! --
//! asn_TYPE_descriptor_t asn_DEF_Foo = {
//!     "Foo",
//!     "Foo",
//!     &asn_OP_SEQUENCE,
//!     asn_DEF_Foo_tags_1,
//!     sizeof(asn_DEF_Foo_tags_1)
//!         /sizeof(asn_DEF_Foo_tags_1[0]), /* 1 */
//!     { 0, 0, SEQUENCE_constraint },
//!     asn_MBR_Foo_1,
//!     3,  /* Elements count */
//!     &asn_SPC_Foo_specs_1    /* Additional specs */
//! };
//! ```
//!
//! Each physical line maps to exactly one [`LineKind`]. The checks run in a
//! fixed order and the first match wins:
//!
//! - `Blank` - empty after trimming (or after stripping comments)
//! - `Separator` - exactly `--`
//! - `Terminator` - exactly `};`
//! - `Declaration` - `asn_TYPE_descriptor_t asn_DEF_<NAME> ... = ... {`
//! - `EmbeddedStruct` - starts with `{`, through the first `},`
//! - `QuotedString` - starts with `"..."` followed by a comma
//! - `TrailingComma` - anything else ending in a comma
//! - `Continuation` - everything else
//!
//! The structural kinds come before `TrailingComma` so that braces and
//! quoted strings holding commas are not split apart.

use std::sync::LazyLock;

use regex::Regex;

/// Compiled line patterns, built once.
struct LinePatterns {
    comment: Regex,
    declaration: Regex,
    embedded: Regex,
    quoted: Regex,
}

static PATTERNS: LazyLock<LinePatterns> = LazyLock::new(|| LinePatterns {
    comment: Regex::new(r"/\*.*\*/").expect("comment pattern"),
    declaration: Regex::new(r"(?i)^asn_TYPE_descriptor_t\s+asn_DEF_(\w+).*=.*\{.*$")
        .expect("declaration pattern"),
    embedded: Regex::new(r"^\{.*?\},").expect("embedded struct pattern"),
    quoted: Regex::new(r#"^"(.*)","#).expect("quoted string pattern"),
});

/// Block separator sentinel.
pub const SEPARATOR: &str = "--";

/// Record terminator.
pub const TERMINATOR: &str = "};";

/// Classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Nothing left after trimming.
    Blank,
    /// `--` between record blocks; re-enables scanning.
    Separator,
    /// `};` closing the current record.
    Terminator,
    /// Opens a new record named `name`.
    Declaration { name: String },
    /// A brace group such as `{ 0, 0, 0 }`, kept whole.
    EmbeddedStruct { text: String },
    /// A quoted string field, quotes removed.
    QuotedString { contents: String },
    /// A comma-terminated line: one primary field plus trailing extras.
    TrailingComma { primary: String, extra: Vec<String> },
    /// A fragment of a field that continues on a later line.
    Continuation { fragment: String },
}

impl LineKind {
    /// Short display name, used in traces and logs.
    pub fn name(&self) -> &'static str {
        match self {
            LineKind::Blank => "BLANK",
            LineKind::Separator => "SEPARATOR",
            LineKind::Terminator => "TERMINATOR",
            LineKind::Declaration { .. } => "DECLARATION",
            LineKind::EmbeddedStruct { .. } => "STRUCT",
            LineKind::QuotedString { .. } => "STRING",
            LineKind::TrailingComma { .. } => "COMMA",
            LineKind::Continuation { .. } => "CONTINUATION",
        }
    }

    /// Does this kind only take effect inside a record body?
    ///
    /// Blank lines and separators are handled whether or not scanning is on;
    /// everything else is skipped between a terminator and the next `--`.
    pub fn needs_scanning(&self) -> bool {
        !matches!(self, LineKind::Blank | LineKind::Separator)
    }
}

/// Remove `/* ... */` comments from a line and re-trim it.
///
/// The match is greedy: everything from the first `/*` to the last `*/` goes,
/// including code between two comments on the same line.
pub fn strip_comments(line: &str) -> String {
    PATTERNS.comment.replace_all(line, "").trim().to_string()
}

/// Classify one physical input line.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();

    if line.is_empty() {
        return LineKind::Blank;
    }
    if line == SEPARATOR {
        return LineKind::Separator;
    }

    let body = strip_comments(line);
    if body.is_empty() {
        return LineKind::Blank;
    }

    classify_body(&body)
}

/// Classify a trimmed, comment-free line from inside a record body.
fn classify_body(line: &str) -> LineKind {
    if line == TERMINATOR {
        return LineKind::Terminator;
    }

    if let Some(caps) = PATTERNS.declaration.captures(line) {
        return LineKind::Declaration {
            name: caps[1].to_string(),
        };
    }

    if let Some(m) = PATTERNS.embedded.find(line) {
        let text = m.as_str();
        return LineKind::EmbeddedStruct {
            text: text[..text.len() - 1].to_string(),
        };
    }

    if let Some(caps) = PATTERNS.quoted.captures(line) {
        return LineKind::QuotedString {
            contents: caps[1].to_string(),
        };
    }

    if line.ends_with(',') {
        return split_trailing_comma(line);
    }

    LineKind::Continuation {
        fragment: line.to_string(),
    }
}

/// Split a comma-terminated line into its primary field and extra tokens.
///
/// The primary part is kept even when empty; extras are kept only when
/// non-empty, so the final empty piece after the trailing comma vanishes.
fn split_trailing_comma(line: &str) -> LineKind {
    let mut parts = line.split(',').map(str::trim);
    let primary = parts.next().unwrap_or_default().to_string();
    let extra = parts.filter(|p| !p.is_empty()).map(str::to_string).collect();
    LineKind::TrailingComma { primary, extra }
}
