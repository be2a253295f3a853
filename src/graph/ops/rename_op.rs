use crate::graph::*;

pub struct RenameFieldsOp {
    renames: Vec<(String, String)>,
}

impl RenameFieldsOp {
    const NAME: &'static str = "RenameFieldsOp";

    /// Rename source fields to their canonical names, in the given order.
    ///
    /// A renamed field replaces any field already stored under the new name. Fields absent from
    /// a record are skipped.
    pub fn new<S: Into<String>, T: Into<String>>(
        renames: impl IntoIterator<Item = (S, T)>,
    ) -> Self {
        Self {
            renames: renames
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}

impl GraphNode for RenameFieldsOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        for (from, to) in &self.renames {
            record.rename(from, to);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_record;
    use serde_json::json;

    #[test]
    fn renames_present_fields() {
        let mut op = RenameFieldsOp::new([
            ("collected", "date"),
            ("submitted", "date_submitted"),
            ("updated", "date_updated"),
        ]);

        let r = op
            .run(test_record(1, json!({"collected": "2020", "submitted": "2020-02-01"})))
            .unwrap()
            .unwrap();
        assert_eq!(r.get_str("date"), Some("2020"));
        assert_eq!(r.get_str("date_submitted"), Some("2020-02-01"));
        assert!(!r.contains("collected"));
        assert!(!r.contains("date_updated"));
    }
}
