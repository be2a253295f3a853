use regex::{Regex, RegexBuilder};

use crate::errors::*;

/// Ordered find-and-replace rules.
///
/// Rules are case-insensitive and each one replaces at most its first match. They are applied in
/// order, so a rule sees the output of every rule before it: list specific prefixes before the
/// generic prefixes they start with.
pub struct Patterns {
    patterns: Vec<Pattern>,
}

pub struct Pattern {
    regex: Regex,
    replacement: String,
}

impl Patterns {
    pub fn new(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// Compile `(regex, replacement)` pairs, keeping their order.
    pub fn from_strs<S: AsRef<str>, T: AsRef<str>>(
        patterns: impl IntoIterator<Item = (S, T)>,
    ) -> Result<Self> {
        Ok(Self::new(
            patterns
                .into_iter()
                .map(|(p, r)| Pattern::new(p.as_ref(), r.as_ref()))
                .collect::<Result<Vec<_>>>()?,
        ))
    }

    pub fn apply(&self, s: &str) -> String {
        self.patterns
            .iter()
            .fold(s.to_owned(), |acc, p| p.apply(&acc))
    }
}

impl Pattern {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config(format!("bad pattern \"{pattern}\": {e}")))?;

        Ok(Self {
            regex,
            replacement: replacement.to_owned(),
        })
    }

    pub fn apply(&self, s: &str) -> String {
        self.regex
            .replacen(s, 1, self.replacement.as_str())
            .into_owned()
    }
}
