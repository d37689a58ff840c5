//! A single extracted descriptor record.

use std::fmt;

/// Default separator placed between fields on an output line.
pub const DEFAULT_DELIMITER: char = ':';

/// One descriptor table, as an ordered list of fields.
///
/// The first field is always the declared type name (the part after
/// `asn_DEF_`). The number of remaining fields depends on how the source
/// table was written and is never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Start a record for the declared type `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fields: vec![name.into()],
        }
    }

    /// The declared type name.
    pub fn name(&self) -> &str {
        &self.fields[0]
    }

    /// All fields, name first.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false; a record carries at least its name.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push_field(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    /// Render the record as one line (without the newline).
    pub fn to_line(&self, delimiter: char) -> String {
        let mut buf = [0u8; 4];
        let sep: &str = delimiter.encode_utf8(&mut buf);
        self.fields.join(sep)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(DEFAULT_DELIMITER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_name_field() {
        let r = Record::new("Foo");
        assert_eq!(r.name(), "Foo");
        assert_eq!(r.len(), 1);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_fields_keep_order() {
        let mut r = Record::new("Foo");
        r.push_field("Foo");
        r.push_field("XMLFoo");
        assert_eq!(r.fields(), ["Foo", "Foo", "XMLFoo"]);
    }

    #[test]
    fn test_display_uses_colon() {
        let mut r = Record::new("X");
        r.push_field("foo");
        r.push_field("bar");
        assert_eq!(r.to_string(), "X:foo:bar");
    }

    #[test]
    fn test_to_line_custom_delimiter() {
        let mut r = Record::new("X");
        r.push_field("a:b");
        assert_eq!(r.to_line('|'), "X|a:b");
        assert_eq!(r.to_line('\t'), "X\ta:b");
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let mut r = Record::new("X");
        r.push_field("");
        r.push_field("0");
        assert_eq!(r.to_string(), "X::0");
    }
}
