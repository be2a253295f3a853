use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::*;

/// US state abbreviations and the set of full state names.
#[derive(Debug, Default)]
pub struct StateCodes {
    by_code: FxHashMap<String, String>,
    names: FxHashSet<String>,
}

#[derive(Debug, Deserialize)]
struct StateCodeRecord {
    code: String,
    name: String,
}

impl StateCodes {
    /// Read a headerless `abbreviation\tfull name` table.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .has_headers(false)
            .from_path(file)
            .map_err(|e| Error::file_io(file, e))?;

        Self::from_csv(rdr, &file.display().to_string())
    }

    /// Like [`StateCodes::from_file`], but a missing file means an empty table.
    pub fn from_optional_file(file: Option<impl AsRef<Path>>) -> Result<Self> {
        match file {
            Some(f) if f.as_ref().exists() => Self::from_file(f),
            Some(f) => {
                warn!(
                    "no state codes at {}, US divisions will not be expanded",
                    f.as_ref().display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_reader(reader: impl std::io::Read, origin: &str) -> Result<Self> {
        let rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .has_headers(false)
            .from_reader(reader);

        Self::from_csv(rdr, origin)
    }

    fn from_csv<R: std::io::Read>(mut rdr: csv::Reader<R>, origin: &str) -> Result<Self> {
        let mut res = Self::default();

        for (i, result) in rdr.deserialize().enumerate() {
            let record: StateCodeRecord = result.map_err(|e| Error::ParseTable {
                file: origin.to_owned(),
                line: i + 1,
                reason: e.to_string(),
            })?;
            res.insert(record.code.trim(), record.name.trim());
        }

        info!("loaded {} state codes from {origin}", res.by_code.len());
        Ok(res)
    }

    pub fn insert(&mut self, code: &str, name: &str) {
        self.by_code
            .insert(code.to_uppercase(), name.to_owned());
        self.names.insert(name.to_lowercase());
    }

    /// The full name for an abbreviation, ignoring case.
    pub fn expand(&self, code: &str) -> Option<&str> {
        self.by_code.get(&code.trim().to_uppercase()).map(|s| s.as_str())
    }

    /// Whether `name` is a full state name, ignoring case.
    pub fn is_state(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_lowercase())
    }
}
