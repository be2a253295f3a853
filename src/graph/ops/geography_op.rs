use serde_json::Value;

use crate::graph::*;
use crate::parse_utils::{non_empty, title_case};
use crate::state_codes::StateCodes;

pub struct ParseGeographyOp {
    source_field: String,
    states: StateCodes,
}

/// `country`, `division` and `location` parsed out of one geography string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geography {
    pub country: String,
    pub division: Option<String>,
    pub location: Option<String>,
}

impl ParseGeographyOp {
    const NAME: &'static str = "ParseGeographyOp";

    /// Split a `country[: division[, location]]` string from `source_field` into the `country`,
    /// `division` and `location` fields. Missing parts become null.
    ///
    /// For `USA`, state codes are expanded and a state found in the location slot is swapped
    /// into the division slot. Division and location are then title-cased for every country.
    ///
    /// Any other shape of string stops the run: it means the feed format changed.
    pub fn new(source_field: impl Into<String>, states: StateCodes) -> Self {
        Self {
            source_field: source_field.into(),
            states,
        }
    }

    pub fn parse(&self, s: &str, line_number: usize) -> Result<Geography> {
        let shape_err = || Error::GeographyShape {
            string: s.to_owned(),
            line_number,
        };

        let (country, rest) = match s.split(':').collect::<Vec<_>>()[..] {
            [country] => (country, None),
            [country, rest] => (country, Some(rest)),
            _ => return Err(shape_err()),
        };

        let (division, location) = match rest.map(|r| r.split(',').collect::<Vec<_>>()) {
            None => (None, None),
            Some(parts) => match parts[..] {
                [division] => (non_empty(division), None),
                [division, location] => (non_empty(division), non_empty(location)),
                _ => return Err(shape_err()),
            },
        };

        let mut geo = Geography {
            country: country.trim().to_owned(),
            division: division.map(str::to_owned),
            location: location.map(str::to_owned),
        };

        if geo.country == "USA" {
            self.fix_usa(&mut geo);
        }

        geo.division = geo.division.as_deref().map(title_case);
        geo.location = geo.location.as_deref().map(title_case);

        Ok(geo)
    }

    fn fix_usa(&self, geo: &mut Geography) {
        let state = |s: &str| {
            self.states
                .expand(s)
                .map(str::to_owned)
                .or_else(|| self.states.is_state(s).then(|| s.to_owned()))
        };

        let division_state = geo.division.as_deref().and_then(state);
        let location_state = geo.location.as_deref().and_then(state);

        match (division_state, location_state) {
            (Some(d), _) => geo.division = Some(d),
            // `USA: King, WA`
            (None, Some(l)) => {
                geo.location = geo.division.take();
                geo.division = Some(l);
            }
            (None, None) => {}
        }
    }
}

impl GraphNode for ParseGeographyOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        let raw = record.get_str(&self.source_field).unwrap_or("");
        let geo = self.parse(raw, record.line_number())?;

        let opt = |v: Option<String>| v.map_or(Value::Null, Value::String);
        record.set(COUNTRY, geo.country);
        record.set(DIVISION, opt(geo.division));
        record.set(LOCATION, opt(geo.location));

        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
