//! Pick one record per strain and remember where each survivor came from in the feed.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use crate::record::*;

/// Sorts after every real date.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Submitted<'a> {
    On(&'a str),
    Unknown,
}

fn sort_key(r: &Record) -> (&str, Reverse<i64>, Submitted<'_>, usize) {
    let submitted = match r.get_str(DATE_SUBMITTED).map(str::trim) {
        Some(d) if !d.is_empty() => Submitted::On(d),
        _ => Submitted::Unknown,
    };

    (
        r.get_str(STRAIN).unwrap_or(""),
        Reverse(r.length()),
        submitted,
        r.line_number(),
    )
}

/// Order records by strain, then longest sequence, then earliest submission, then feed order.
///
/// Records without a submission date come after every dated record of the same strain and
/// length.
pub fn compare(a: &Record, b: &Record) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sort with [`compare`] and keep the first record of each strain.
///
/// Returns the survivors in sorted order and the number of duplicates dropped.
pub fn dedup_by_strain(mut records: Vec<Record>) -> (Vec<Record>, usize) {
    records.sort_by(compare);

    let before = records.len();
    records.dedup_by(|later, earlier| later.get_str(STRAIN) == earlier.get_str(STRAIN));

    let dropped = before - records.len();
    (records, dropped)
}

/// Line number → canonical strain name for every surviving record.
pub fn correlation_set(records: &[Record]) -> BTreeMap<usize, String> {
    records
        .iter()
        .map(|r| {
            (
                r.line_number(),
                r.get_str(STRAIN).unwrap_or("").to_owned(),
            )
        })
        .collect()
}
