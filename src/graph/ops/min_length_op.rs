use crate::graph::*;

pub struct MinLengthOp {
    min_length: i64,
}

impl MinLengthOp {
    const NAME: &'static str = "MinLengthOp";

    /// Remove records whose `length` is below `min_length`.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length: min_length as i64,
        }
    }
}

impl GraphNode for MinLengthOp {
    fn run(&mut self, record: Record) -> Result<Option<Record>> {
        if record.length() < self.min_length {
            Ok(None)
        } else {
            Ok(Some(record))
        }
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Filter
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
    fn threshold_is_inclusive() {
        let mut op = MinLengthOp::new(15000);

        assert!(op.run(test_record(1, json!({"length": 14999}))).unwrap().is_none());
        assert!(op.run(test_record(2, json!({"length": 15000}))).unwrap().is_some());
        assert!(op.run(test_record(3, json!({}))).unwrap().is_none());
    }
}
