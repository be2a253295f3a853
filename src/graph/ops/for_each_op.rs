use tracing::trace;

use crate::graph::*;

pub struct ForEachOp<F: Fn(&mut Record)> {
    func: F,
}

impl<F: Fn(&mut Record)> ForEachOp<F> {
    const NAME: &'static str = "ForEachOp";

    /// Apply an arbitrary function on each record.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F: Fn(&mut Record)> GraphNode for ForEachOp<F> {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        (self.func)(&mut record);
        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

pub struct DbgOp;

impl DbgOp {
    /// Log each record at trace level.
    pub fn new() -> ForEachOp<impl Fn(&mut Record)> {
        ForEachOp::new(|record: &mut Record| trace!("{record}"))
    }
}
