use lazy_static::lazy_static;
use regex::Regex;

use crate::graph::*;
use crate::Patterns;

/// Prefix corrections for strain names, most specific first.
pub const STRAIN_RULES: &[(&str, &str)] = &[
    (r"^SARS-CoV-2/human/", ""),
    (r"^SARS-CoV-2/", ""),
    (r"^hCoV-19/", ""),
    (r"^BetaCoV/", ""),
    (r"^USA-", "USA/"),
];

lazy_static! {
    static ref TITLE_STRAIN: Regex = Regex::new(r"[-\w.]+(?:/[-\w.]+){2,}").unwrap();
}

pub struct StrainNameOp {
    rules: Patterns,
}

impl StrainNameOp {
    const NAME: &'static str = "StrainNameOp";

    /// Canonicalize `strain`.
    ///
    /// An empty strain is first taken from the `a/b/c` shaped path in `title`. Then each rule
    /// is applied once, in order, and all whitespace is removed.
    pub fn new(rules: Patterns) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Result<Self> {
        Ok(Self::new(Patterns::from_strs(STRAIN_RULES.iter().copied())?))
    }

    pub fn canonical(&self, strain: &str, title: &str) -> String {
        let strain = if strain.trim().is_empty() {
            TITLE_STRAIN.find(title).map_or("", |m| m.as_str())
        } else {
            strain
        };

        self.rules
            .apply(strain)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }
}

impl GraphNode for StrainNameOp {
    fn run(&mut self, mut record: Record) -> Result<Option<Record>> {
        let strain = self.canonical(
            record.get_str(STRAIN).unwrap_or(""),
            record.get_str(TITLE).unwrap_or(""),
        );
        record.set(STRAIN, strain);
        Ok(Some(record))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Transform
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
