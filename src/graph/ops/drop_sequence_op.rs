use crate::graph::*;

pub struct DropSequenceOp;

impl DropSequenceOp {
    const NAME: &'static str = "DropSequenceOp";

    /// Remove the `sequence` payload so only metadata is held in memory. The sequence is read
    /// again from the feed by line number once the surviving records are known.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DropSequenceOp {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for DropSequenceOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        record.remove(SEQUENCE);
        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
