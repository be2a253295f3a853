use crate::graph::*;
use crate::writers::FastaWriter;

pub struct OutputFastaOp {
    writer: FastaWriter,
}

impl OutputFastaOp {
    const NAME: &'static str = "OutputFastaOp";

    /// Write each record's `strain` and `sequence` as a FASTA record. Records without either
    /// field stop the run.
    pub fn new(writer: FastaWriter) -> Self {
        Self { writer }
    }
}

impl GraphNode for OutputFastaOp {
    fn run(&mut self, record: Record) -> Result<Option<Record>> {
        self.writer.write_record(&record)?;
        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.finish()
    }
}
