use crate::graph::*;

pub struct FillExposureOp {
    unknown: String,
}

impl FillExposureOp {
    const NAME: &'static str = "FillExposureOp";

    /// Copy `region`, `country` and `division` into their `*_exposure` fields unless the
    /// exposure field already holds something other than blank or `unknown`.
    pub fn new(unknown: impl Into<String>) -> Self {
        Self {
            unknown: unknown.into(),
        }
    }
}

impl GraphNode for FillExposureOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        for field in [REGION, COUNTRY, DIVISION] {
            let exposure = format!("{field}_exposure");
            let known = !record.is_blank(&exposure)
                && record.get_str(&exposure) != Some(self.unknown.as_str());

            if !known {
                let value = record.get(field).cloned().unwrap_or_default();
                record.set(exposure, value);
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
