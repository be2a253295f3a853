use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::errors::*;
use crate::parse_utils::strip_comment;

/// Curated field values keyed by record id.
///
/// Patches are last-write-wins: a later row for the same id and field replaces the earlier one,
/// and applying a patch overwrites whatever the record held.
#[derive(Debug, Default)]
pub struct Annotations {
    by_id: FxHashMap<String, BTreeMap<String, String>>,
}

impl Annotations {
    /// Read `record_id\tfield\tvalue` rows. Rows with any other number of columns are logged
    /// and skipped.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let reader = File::open(file).map_err(|e| Error::file_io(file, e))?;
        Self::from_reader(BufReader::new(reader), &file.display().to_string())
    }

    /// Like [`Annotations::from_file`], but a missing file means no annotations.
    pub fn from_optional_file(file: Option<impl AsRef<Path>>) -> Result<Self> {
        match file {
            Some(f) if f.as_ref().exists() => Self::from_file(f),
            Some(f) => {
                info!("no annotations at {}", f.as_ref().display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_reader(reader: impl BufRead, origin: &str) -> Result<Self> {
        let mut res = Self::default();
        let mut rows = 0;

        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::file_io(origin, e))?;
            let line = strip_comment(&line);
            if line.trim().is_empty() {
                continue;
            }

            match line.split('\t').collect::<Vec<_>>()[..] {
                [id, field, value] => {
                    res.insert(id.trim(), field.trim(), value.trim());
                    rows += 1;
                }
                _ => warn!(
                    "skipping malformed annotation on line {} of {origin}, expected 3 columns: {line:?}",
                    i + 1
                ),
            }
        }

        info!("loaded {rows} annotations for {} records from {origin}", res.len());
        Ok(res)
    }

    /// Build a single-field table from a TSV crosswalk with a header row.
    ///
    /// Each row maps the value in `key_column` to the value in `value_column`, which is stored
    /// under `field`. Rows with an empty value are ignored.
    pub fn from_crosswalk(
        file: impl AsRef<Path>,
        key_column: &str,
        value_column: &str,
        field: &str,
    ) -> Result<Self> {
        let file = file.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_path(file)
            .map_err(|e| Error::file_io(file, e))?;

        let headers = rdr.headers().map_err(|e| Error::file_io(file, e))?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::ParseTable {
                    file: file.display().to_string(),
                    line: 1,
                    reason: format!("missing column \"{name}\""),
                })
        };
        let key_idx = column(key_column)?;
        let value_idx = column(value_column)?;

        let mut res = Self::default();
        for row in rdr.records() {
            let row = row.map_err(|e| Error::file_io(file, e))?;
            let (Some(key), Some(value)) = (row.get(key_idx), row.get(value_idx)) else {
                continue;
            };
            if key.trim().is_empty() || value.trim().is_empty() {
                continue;
            }
            res.insert(key.trim(), field, value.trim());
        }

        info!("loaded {} crosswalk entries from {}", res.len(), file.display());
        Ok(res)
    }

    /// Like [`Annotations::from_crosswalk`], but a missing file means no entries.
    pub fn from_optional_crosswalk(
        file: Option<impl AsRef<Path>>,
        key_column: &str,
        value_column: &str,
        field: &str,
    ) -> Result<Self> {
        match file {
            Some(f) if f.as_ref().exists() => {
                Self::from_crosswalk(f, key_column, value_column, field)
            }
            Some(f) => {
                info!("no crosswalk at {}", f.as_ref().display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn insert(&mut self, id: &str, field: &str, value: &str) {
        self.by_id
            .entry(id.to_owned())
            .or_default()
            .insert(field.to_owned(), value.to_owned());
    }

    /// Number of annotated records.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BTreeMap<String, String>> {
        self.by_id.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn annotations_skip_comments_and_malformed_rows() {
        let tsv = "\
# curated fixes
MN908947\tstrain\tWuhan-Hu-1/2019 # reference
MN908947\thost\tHomo sapiens
MT000001\tdivision
MT000002\tcountry\tChina\textra
MN908947\thost\tHuman
";
        let a = Annotations::from_reader(tsv.as_bytes(), "test").unwrap();

        assert_eq!(a.len(), 1);
        let fields = a.get("MN908947").unwrap();
        assert_eq!(fields["strain"], "Wuhan-Hu-1/2019");
        assert_eq!(fields["host"], "Human");
        assert!(a.get("MT000001").is_none());
    }

    #[test]
    fn crosswalk_reads_named_columns() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "genbank_accession_rev\tstrain\tgisaid_epi_isl").unwrap();
        writeln!(f, "MN908947.3\tWuhan-Hu-1/2019\tEPI_ISL_402125").unwrap();
        writeln!(f, "MT000001.1\tUSA/X/2020\t").unwrap();
        f.flush().unwrap();

        let a = Annotations::from_crosswalk(
            f.path(),
            "genbank_accession_rev",
            "gisaid_epi_isl",
            "gisaid_epi_isl",
        )
        .unwrap();

        assert_eq!(a.len(), 1);
        assert_eq!(a.get("MN908947.3").unwrap()["gisaid_epi_isl"], "EPI_ISL_402125");
    }

    #[test]
    fn crosswalk_without_key_column_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "accession\tgisaid_epi_isl").unwrap();
        f.flush().unwrap();

        let res = Annotations::from_crosswalk(
            f.path(),
            "genbank_accession_rev",
            "gisaid_epi_isl",
            "gisaid_epi_isl",
        );
        assert!(matches!(res, Err(Error::ParseTable { .. })));
    }
}
