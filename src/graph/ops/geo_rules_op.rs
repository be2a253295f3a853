use serde_json::Value;

use crate::geo_rules::{GeoPath, GeoRules};
use crate::graph::*;

pub struct GeoRulesOp {
    rules: GeoRules,
}

impl GeoRulesOp {
    const NAME: &'static str = "GeoRulesOp";

    /// Replace a record's `region/country/division/location` with its correction when the rule
    /// table has an exact match for it.
    ///
    /// Records hold null for an unknown component, the table holds `""`. Null is looked up as
    /// `""`. On a match, a `""` in the correction becomes null again where the record's
    /// component was null, and stays `""` where it was blank. Records without a match are left
    /// untouched.
    pub fn new(rules: GeoRules) -> Self {
        Self { rules }
    }
}

impl GraphNode for GeoRulesOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        if self.rules.is_empty() {
            return Ok(Some(record));
        }

        let unknown = GEOGRAPHY.map(|f| matches!(record.get(f), None | Some(Value::Null)));
        let key: GeoPath = GEOGRAPHY.map(|f| record.cell(f, "").into_owned());

        let Some(new) = self.rules.get(&key) else {
            return Ok(Some(record));
        };

        for ((field, value), was_unknown) in GEOGRAPHY.iter().zip(new.iter()).zip(unknown) {
            if value.is_empty() && was_unknown {
                record.set(*field, Value::Null);
            } else {
                record.set(*field, value.as_str());
            }
        }

        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
