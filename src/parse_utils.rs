use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::*;

/// One piece of a format string such as `https://example.org/{genbank_accession}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FmtPart {
    Literal(String),
    Field(String),
}

/// Split a format string into literals and `{field}` references. `\` escapes a brace.
pub fn parse_fmt(fmt: &str) -> Result<Vec<FmtPart>> {
    let mut res = Vec::new();
    let mut curr = String::new();
    let mut escape = false;
    let mut in_field = false;

    let err = |reason: &str| Error::Config(format!("bad format string \"{fmt}\": {reason}"));

    for c in fmt.chars() {
        match c {
            '{' if !escape => {
                if in_field {
                    return Err(err("cannot have nested braces"));
                }
                if !curr.is_empty() {
                    res.push(FmtPart::Literal(std::mem::take(&mut curr)));
                }
                in_field = true;
            }
            '}' if !escape => {
                if !in_field {
                    return Err(err("unbalanced braces"));
                }
                let field = non_empty(&curr).ok_or_else(|| err("empty field name"))?;
                res.push(FmtPart::Field(field.to_owned()));
                in_field = false;
                curr.clear();
            }
            '\\' if !escape => escape = true,
            _ => {
                escape = false;
                curr.push(c);
            }
        }
    }

    if in_field {
        return Err(err("unbalanced braces"));
    }
    if !curr.is_empty() {
        res.push(FmtPart::Literal(curr));
    }

    Ok(res)
}

/// Drop everything from the first `#` and trailing whitespace.
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => line[..i].trim_end(),
        None => line.trim_end(),
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, or `None` if nothing is left.
pub fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Lowercase everything, then uppercase the first letter of each word.
///
/// Words are separated by whitespace or `-`, so `SAN LUIS-OBISPO` becomes `San Luis-Obispo`.
pub fn title_case(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut start = true;

    for c in s.chars() {
        if start {
            res.extend(c.to_uppercase());
        } else {
            res.extend(c.to_lowercase());
        }
        start = c.is_whitespace() || c == '-';
    }

    res
}

/// Standardize a collection date to `YYYY-MM-DD`, with `XX` for unknown month or day.
///
/// Returns `?` if the date cannot be read at all.
pub fn collection_date(s: &str) -> String {
    let s = s.trim();

    if let Some(d) = timestamp_date(s) {
        return d.format("%Y-%m-%d").to_string();
    }

    let parts = s.split('-').collect::<Vec<_>>();
    let valid_year = |y: &str| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit());
    let valid_month = |m: &str| m.parse::<u32>().map_or(false, |m| (1..=12).contains(&m));

    match parts[..] {
        [y] if valid_year(y) => format!("{y}-XX-XX"),
        [y, m] if valid_year(y) && valid_month(m) => {
            format!("{y}-{:02}-XX", m.parse::<u32>().unwrap_or_default())
        }
        _ => "?".to_owned(),
    }
}

/// Parse a full date or a timestamp and keep only the date.
pub fn timestamp_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
}
