use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::errors::*;
use crate::parse_utils::strip_comment;

/// A `region/country/division/location` path. An empty component means "known to be blank".
pub type GeoPath = [String; 4];

/// Exact-match geo-location corrections.
///
/// Every known-bad path has to be listed: there is no prefix or fuzzy matching, so a rule for
/// `Europe/Spain/Catalunya/Mataró` leaves `Europe/Spain/Catalunya/Mataró-2` alone.
#[derive(Debug, Default)]
pub struct GeoRules {
    rules: FxHashMap<GeoPath, GeoPath>,
}

impl GeoRules {
    /// Read `old\tnew` rules. Rows that are not two 4-component paths are logged and skipped.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let reader = File::open(file).map_err(|e| Error::file_io(file, e))?;
        Self::from_reader(BufReader::new(reader), &file.display().to_string())
    }

    /// Like [`GeoRules::from_file`], but a missing file means no rules.
    pub fn from_optional_file(file: Option<impl AsRef<Path>>) -> Result<Self> {
        match file {
            Some(f) if f.as_ref().exists() => Self::from_file(f),
            Some(f) => {
                info!("no geo-location rules at {}", f.as_ref().display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_reader(reader: impl BufRead, origin: &str) -> Result<Self> {
        let mut rules = FxHashMap::default();

        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::file_io(origin, e))?;
            let line = strip_comment(&line);
            if line.trim().is_empty() {
                continue;
            }

            let parsed = match line.split('\t').collect::<Vec<_>>()[..] {
                [old, new] => parse_path(old).zip(parse_path(new)),
                _ => None,
            };

            match parsed {
                Some((old, new)) => {
                    rules.insert(old, new);
                }
                None => warn!("skipping malformed geo-location rule on line {} of {origin}: {line:?}", i + 1),
            }
        }

        info!("loaded {} geo-location rules from {origin}", rules.len());
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The corrected path for an exact match.
    pub fn get(&self, path: &GeoPath) -> Option<&GeoPath> {
        self.rules.get(path)
    }
}

fn parse_path(s: &str) -> Option<GeoPath> {
    match s.trim().split('/').collect::<Vec<_>>()[..] {
        [r, c, d, l] => Some([r, c, d, l].map(|p| p.trim().to_owned())),
        _ => None,
    }
}
