use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::graph::*;
use crate::writers::TsvWriter;

/// The reference strain, which does not follow the usual naming scheme.
pub const REFERENCE_STRAIN: &str = "Wuhan-Hu-1/2019";

lazy_static! {
    static ref STRAIN_SHAPE: Regex = Regex::new(r"^([\w]*/)?[\w]*/[-_.\w]*/[\d]{4}$").unwrap();
}

pub struct ProblemRecordsOp {
    /// `None` once finished.
    output: Option<TsvWriter>,
    diverted: usize,
}

impl ProblemRecordsOp {
    const NAME: &'static str = "ProblemRecordsOp";

    /// Remove records that need a curator: blank `region` or `country`, or a `strain` that is
    /// not shaped like `[host/]country/id/year`.
    ///
    /// Removed records are appended to `output` with its columns, as they were when removed.
    pub fn new(output: TsvWriter) -> Self {
        Self {
            output: Some(output),
            diverted: 0,
        }
    }

    pub fn diverted(&self) -> usize {
        self.diverted
    }

    /// Why the record needs curation, if it does.
    pub fn problem(record: &Record) -> Option<&'static str> {
        if record.is_blank(REGION) {
            return Some("blank region");
        }
        if record.is_blank(COUNTRY) {
            return Some("blank country");
        }

        let strain = record.get_str(STRAIN).unwrap_or("");
        if strain != REFERENCE_STRAIN && !STRAIN_SHAPE.is_match(strain) {
            return Some("malformed strain name");
        }

        None
    }
}

impl GraphNode for ProblemRecordsOp {
    fn run(&mut self, record: Record) -> Result<Option<Record>> {
        let Some(problem) = Self::problem(&record) else {
            return Ok(Some(record));
        };

        debug!(line_number = record.line_number(), problem, "diverting record");
        if let Some(output) = &mut self.output {
            output.write(&record)?;
        }
        self.diverted += 1;

        Ok(None)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn finish(&mut self) -> Result<()> {
        match self.output.take() {
            Some(output) => output.finish(),
            None => Ok(()),
        }
    }
}
