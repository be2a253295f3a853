use crate::graph::*;
use crate::parse_utils::{parse_fmt, FmtPart};

pub struct SetFieldsOp {
    constants: Vec<(String, String)>,
    formatted: Vec<(String, Vec<FmtPart>)>,
}

impl SetFieldsOp {
    const NAME: &'static str = "SetFieldsOp";

    /// Stamp fields whose value does not depend on the record, overwriting anything already
    /// there.
    pub fn new<S: Into<String>, T: Into<String>>(
        constants: impl IntoIterator<Item = (S, T)>,
    ) -> Self {
        Self {
            constants: constants
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            formatted: Vec::new(),
        }
    }

    /// Also set `field` from a format string such as `https://host/nuccore/{genbank_accession}`.
    ///
    /// Fields referenced by the format string that are missing from a record format as an empty
    /// string. Formatted fields are set after the constants.
    pub fn with_format(mut self, field: impl Into<String>, fmt: &str) -> Result<Self> {
        self.formatted.push((field.into(), parse_fmt(fmt)?));
        Ok(self)
    }
}

impl GraphNode for SetFieldsOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        for (field, value) in &self.constants {
            record.set(field.as_str(), value.as_str());
        }

        for (field, parts) in &self.formatted {
            let value = parts
                .iter()
                .map(|p| match p {
                    FmtPart::Literal(s) => s.clone(),
                    FmtPart::Field(f) => record.cell(f, "").into_owned(),
                })
                .collect::<String>();
            record.set(field.as_str(), value);
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
