use std::borrow::Cow;
use std::fmt;

use colored::Colorize;
use serde_json::{Map, Value};

pub const STRAIN: &str = "strain";
pub const LENGTH: &str = "length";
pub const SEQUENCE: &str = "sequence";
pub const DATE: &str = "date";
pub const DATE_SUBMITTED: &str = "date_submitted";
pub const DATE_UPDATED: &str = "date_updated";
pub const TITLE: &str = "title";
pub const AUTHORS: &str = "authors";
pub const ACCESSION: &str = "genbank_accession";
pub const ACCESSION_REV: &str = "genbank_accession_rev";
pub const REGION: &str = "region";
pub const COUNTRY: &str = "country";
pub const DIVISION: &str = "division";
pub const LOCATION: &str = "location";

/// The four geography fields, from coarsest to finest.
pub const GEOGRAPHY: [&str; 4] = [REGION, COUNTRY, DIVISION, LOCATION];

/// One sample from the feed.
///
/// `line_number` is the 1-based line the record was parsed from. It is not business data
/// and is never written to the metadata output; it only ties the records of the first pass
/// to the raw lines re-read by the second pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line_number: usize,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(line_number: usize, fields: Map<String, Value>) -> Self {
        Self {
            line_number,
            fields,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The field's value if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Move a field to a new name, replacing anything already stored under that name.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        if let Some(v) = self.fields.remove(from) {
            self.fields.insert(to.to_owned(), v);
        }
    }

    /// Missing, null, or a string that is empty after trimming.
    pub fn is_blank(&self, field: &str) -> bool {
        match self.fields.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    /// The sequence length, 0 if it was never standardized into an integer.
    pub fn length(&self) -> i64 {
        self.fields
            .get(LENGTH)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Render a field as a single output cell.
    ///
    /// Fields missing from the record render as `placeholder`, null renders as an empty cell.
    pub fn cell<'a>(&'a self, field: &str, placeholder: &'a str) -> Cow<'a, str> {
        match self.fields.get(field) {
            None => Cow::Borrowed(placeholder),
            Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", format!("line {}:", self.line_number).bold())?;

        for (k, v) in &self.fields {
            let v = match v {
                Value::String(s) if k == SEQUENCE && s.len() > 32 => {
                    format!("{}... ({} bases)", s.get(..32).unwrap_or(s), s.len())
                }
                Value::String(s) => s.clone(),
                Value::Null => "null".dimmed().to_string(),
                other => other.to_string(),
            };
            writeln!(f, " {}: {}", k.cyan(), v)?;
        }

        Ok(())
    }
}

/// Build a record from a JSON object literal.
#[cfg(test)]
pub(crate) fn test_record(line_number: usize, v: Value) -> Record {
    let Value::Object(fields) = v else {
        panic!("expected a JSON object")
    };
    Record::new(line_number, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        test_record(1, v)
    }

    #[test]
    fn cells_distinguish_missing_from_null() {
        let r = record(json!({"division": null, "length": 29903, "country": "USA"}));

        assert_eq!(r.cell("division", "?"), "");
        assert_eq!(r.cell("location", "?"), "?");
        assert_eq!(r.cell("length", "?"), "29903");
        assert_eq!(r.cell("country", "?"), "USA");
    }

    #[test]
    fn rename_replaces_existing_target() {
        let mut r = record(json!({"collected": "2020-01-01", "date": "old"}));
        r.rename("collected", "date");

        assert_eq!(r.get_str("date"), Some("2020-01-01"));
        assert!(!r.contains("collected"));
    }

    #[test]
    fn blank_fields() {
        let r = record(json!({"a": null, "b": "  ", "c": "x", "d": 0}));

        assert!(r.is_blank("a"));
        assert!(r.is_blank("b"));
        assert!(!r.is_blank("c"));
        assert!(!r.is_blank("d"));
        assert!(r.is_blank("missing"));
    }
}
