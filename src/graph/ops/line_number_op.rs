use std::collections::BTreeMap;

use crate::graph::*;

pub struct LineNumberOp {
    strains: BTreeMap<usize, String>,
}

impl LineNumberOp {
    const NAME: &'static str = "LineNumberOp";

    /// Keep only records whose line number is a key of `strains`, and give each kept record the
    /// strain name it was resolved to by an earlier pass over the same feed.
    ///
    /// Every line number is expected exactly once; [`GraphNode::finish`] fails if some were never
    /// seen, which means the feed changed between passes.
    pub fn new(strains: BTreeMap<usize, String>) -> Self {
        Self { strains }
    }
}

impl GraphNode for LineNumberOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        match self.strains.remove(&record.line_number()) {
            Some(strain) => {
                record.set(STRAIN, strain);
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn finish(&mut self) -> Result<()> {
        match self.strains.first_key_value() {
            None => Ok(()),
            Some((&line_number, _)) => Err(Error::Record {
                line_number,
                context: Self::NAME,
                reason: format!(
                    "{} records kept by the first pass were not found again in the feed",
                    self.strains.len()
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_record;
    use serde_json::json;

    #[test]
    fn keeps_listed_lines_with_their_strains() {
        let mut op = LineNumberOp::new(BTreeMap::from([
            (2, "USA/B/2020".to_owned()),
            (3, "USA/C/2020".to_owned()),
        ]));

        assert!(op.run(test_record(1, json!({"strain": "a"}))).unwrap().is_none());
        let r = op
            .run(test_record(2, json!({"strain": "hCoV-19/USA/B/2020"})))
            .unwrap()
            .unwrap();
        assert_eq!(r.get_str("strain"), Some("USA/B/2020"));

        assert!(matches!(
            op.finish(),
            Err(Error::Record { line_number: 3, .. })
        ));
        assert!(op.run(test_record(3, json!({}))).unwrap().is_some());
        assert!(op.finish().is_ok());
    }
}
