//! Run configuration, read from YAML. Every key has a default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::*;
use crate::graph::MalformedPolicy;
use crate::writers::Newline;

pub const METADATA_COLUMNS: &[&str] = &[
    "strain",
    "virus",
    "gisaid_epi_isl",
    "genbank_accession",
    "genbank_accession_rev",
    "sra_accession",
    "date",
    "region",
    "country",
    "division",
    "location",
    "region_exposure",
    "country_exposure",
    "division_exposure",
    "segment",
    "length",
    "host",
    "age",
    "sex",
    "originating_lab",
    "submitting_lab",
    "authors",
    "url",
    "title",
    "date_submitted",
    "date_updated",
    "institution",
];

pub const PROBLEM_COLUMNS: &[&str] = &["genbank_accession", "strain", "region", "country", "url"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Newline-delimited JSON feed.
    pub feed: PathBuf,
    pub output_metadata: PathBuf,
    pub output_fasta: PathBuf,
    pub problem_data: PathBuf,

    /// `old\tnew` geo-location corrections.
    pub geo_rules: Option<PathBuf>,
    /// `record_id\tfield\tvalue` curated overrides.
    pub annotations: Option<PathBuf>,
    /// Crosswalk TSV from accession versions to external ids.
    pub accessions: Option<PathBuf>,
    /// `abbreviation\tfull name` US states.
    pub state_codes: Option<PathBuf>,

    pub min_length: usize,
    /// Keep sequences in memory and write both outputs in sorted order in one pass, instead of
    /// reading the feed a second time for the sequences.
    pub sorted_fasta: bool,
    pub newline: Newline,
    pub on_malformed: MalformedPolicy,

    /// Written for columns a record does not have.
    pub placeholder: String,
    pub metadata_columns: Vec<String>,
    pub problem_columns: Vec<String>,

    /// Source field → canonical field.
    pub rename: BTreeMap<String, String>,
    /// Fields that always hold the same value.
    pub hardcoded: BTreeMap<String, String>,
    pub url_template: String,

    /// Record field that annotation ids refer to.
    pub annotation_id: String,
    pub crosswalk: CrosswalkConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrosswalkConfig {
    /// Record field matched against `key_column`.
    pub id_field: String,
    pub key_column: String,
    pub value_column: String,
    /// Record field set from `value_column`.
    pub field: String,
}

impl Default for CrosswalkConfig {
    fn default() -> Self {
        Self {
            id_field: "genbank_accession_rev".to_owned(),
            key_column: "genbank_accession_rev".to_owned(),
            value_column: "gisaid_epi_isl".to_owned(),
            field: "gisaid_epi_isl".to_owned(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let map = |v: &[(&str, &str)]| {
            v.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            feed: PathBuf::from("data/genbank.ndjson"),
            output_metadata: PathBuf::from("data/genbank/metadata.tsv"),
            output_fasta: PathBuf::from("data/genbank/sequences.fasta"),
            problem_data: PathBuf::from("data/genbank/problem_data.tsv"),
            geo_rules: None,
            annotations: None,
            accessions: None,
            state_codes: None,
            min_length: 15000,
            sorted_fasta: false,
            newline: Newline::Platform,
            on_malformed: MalformedPolicy::Skip,
            placeholder: "?".to_owned(),
            metadata_columns: strings(METADATA_COLUMNS),
            problem_columns: strings(PROBLEM_COLUMNS),
            rename: map(&[
                ("collected", "date"),
                ("submitted", "date_submitted"),
                ("updated", "date_updated"),
                ("submitting_organization", "institution"),
            ]),
            hardcoded: map(&[
                ("virus", "ncov"),
                ("segment", "genome"),
                ("gisaid_epi_isl", "?"),
                ("age", "?"),
                ("sex", "?"),
                ("originating_lab", "?"),
                ("submitting_lab", "?"),
                ("region_exposure", "?"),
                ("country_exposure", "?"),
                ("division_exposure", "?"),
            ]),
            url_template: "https://www.ncbi.nlm.nih.gov/nuccore/{genbank_accession}".to_owned(),
            annotation_id: "genbank_accession".to_owned(),
            crosswalk: CrosswalkConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let yaml = std::fs::read_to_string(file).map_err(|e| Error::file_io(file, e))?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.metadata_columns.is_empty() {
            return Err(Error::Config("metadata_columns is empty".to_owned()));
        }
        if self.problem_columns.is_empty() {
            return Err(Error::Config("problem_columns is empty".to_owned()));
        }
        if !self.metadata_columns.iter().any(|c| c == crate::record::STRAIN) {
            return Err(Error::Config(
                "metadata_columns must include \"strain\"".to_owned(),
            ));
        }
        if self.url_template.trim().is_empty() {
            return Err(Error::Config("url_template is empty".to_owned()));
        }
        crate::parse_utils::parse_fmt(&self.url_template)?;
        Ok(())
    }
}
