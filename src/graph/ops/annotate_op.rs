use crate::annotations::Annotations;
use crate::graph::*;

pub struct AnnotateOp {
    id_field: String,
    annotations: Annotations,
}

impl AnnotateOp {
    const NAME: &'static str = "AnnotateOp";

    /// Overwrite fields with curated values for records whose `id_field` has annotations.
    pub fn new(id_field: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            id_field: id_field.into(),
            annotations,
        }
    }
}

impl GraphNode for AnnotateOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        let Some(fields) = record
            .get_str(&self.id_field)
            .and_then(|id| self.annotations.get(id.trim()))
        else {
            return Ok(Some(record));
        };

        for (field, value) in fields {
            record.set(field.as_str(), value.as_str());
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
    fn annotations_overwrite_fields() {
        let tsv = "MN908947\tstrain\tWuhan-Hu-1/2019\nMN908947\tcountry\tChina\n";
        let mut op = AnnotateOp::new(
            "genbank_accession",
            Annotations::from_reader(tsv.as_bytes(), "test").unwrap(),
        );

        let r = op
            .run(test_record(
                1,
                json!({"genbank_accession": "MN908947", "strain": "bad", "country": null}),
            ))
            .unwrap()
            .unwrap();
        assert_eq!(r.get_str("strain"), Some("Wuhan-Hu-1/2019"));
        assert_eq!(r.get_str("country"), Some("China"));

        let r = op
            .run(test_record(2, json!({"genbank_accession": "MT000001", "strain": "ok"})))
            .unwrap()
            .unwrap();
        assert_eq!(r.get_str("strain"), Some("ok"));
    }
}
