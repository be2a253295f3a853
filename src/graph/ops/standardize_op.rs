use serde_json::Value;
use tracing::debug;

use crate::graph::*;
use crate::parse_utils::{collection_date, timestamp_date};

pub struct StandardizeOp;

impl StandardizeOp {
    const NAME: &'static str = "StandardizeOp";

    /// Coerce field types.
    ///
    /// * `date` becomes `YYYY-MM-DD`, with `XX` for an unknown month or day and `?` if unreadable.
    /// * `date_submitted` and `date_updated` lose any time of day. Unreadable values are kept.
    /// * `length` becomes an integer. If it is missing or not a number, the length of `sequence`
    ///   is used, or 0 without a sequence.
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardizeOp {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for StandardizeOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        let date = collection_date(record.get_str(DATE).unwrap_or(""));
        record.set(DATE, date);

        for field in [DATE_SUBMITTED, DATE_UPDATED] {
            if let Some(d) = record.get_str(field).and_then(timestamp_date) {
                record.set(field, d.format("%Y-%m-%d").to_string());
            }
        }

        let length = match record.get(LENGTH) {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let length = length.unwrap_or_else(|| {
            let derived = record.get_str(SEQUENCE).map_or(0, |s| s.len() as i64);
            debug!(
                line_number = record.line_number(),
                "no usable length, using {derived}"
            );
            derived
        });
        record.set(LENGTH, length);

        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
