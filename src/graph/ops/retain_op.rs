use crate::graph::*;

pub struct RetainOp<F: Fn(&Record) -> bool> {
    predicate: F,
}

impl<F: Fn(&Record) -> bool> RetainOp<F> {
    const NAME: &'static str = "RetainOp";

    /// Retain only the records where the predicate is true and discard the rest.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F: Fn(&Record) -> bool> GraphNode for RetainOp<F> {
    fn run(&mut self, record: Record) -> Result<Option<Record>> {
        if (self.predicate)(&record) {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
