use crate::graph::*;
use crate::parse_utils::collapse_whitespace;

pub struct AbbreviateAuthorsOp {
    suffix: String,
    unknown: String,
}

impl AbbreviateAuthorsOp {
    const NAME: &'static str = "AbbreviateAuthorsOp";

    /// Shorten `authors` to the first listed name followed by ` et al`, or `?` when blank.
    pub fn new() -> Self {
        Self::with_markers(" et al", "?")
    }

    pub fn with_markers(suffix: impl Into<String>, unknown: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            unknown: unknown.into(),
        }
    }

    pub fn abbreviate(&self, authors: &str) -> String {
        let authors = collapse_whitespace(authors);
        match authors.split(',').next().map(str::trim) {
            Some(first) if !first.is_empty() => format!("{first}{}", self.suffix),
            _ => self.unknown.clone(),
        }
    }
}

impl Default for AbbreviateAuthorsOp {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for AbbreviateAuthorsOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        let authors = self.abbreviate(record.get_str(AUTHORS).unwrap_or(""));
        record.set(AUTHORS, authors);
        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
