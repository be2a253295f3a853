//! One full run: read the feed, curate every record, pick one record per strain, then write the
//! metadata table and the FASTA file.
//!
//! The first pass drops each sequence as soon as the record's length is known, so only metadata
//! is ever held in memory. Sequences are then fetched by a second pass over the feed that keeps
//! only the surviving line numbers. With `sorted_fasta`, sequences stay on the records instead
//! and both files are written from memory in one go.

use tracing::{info, level_filters::LevelFilter};

use crate::annotations::Annotations;
use crate::config::Config;
use crate::geo_rules::GeoRules;
use crate::graph::*;
use crate::reconcile::{correlation_set, dedup_by_strain};
use crate::state_codes::StateCodes;
use crate::writers::{FastaWriter, TsvWriter};

/// Lookup tables that curate records, loaded once per run.
#[derive(Debug, Default)]
pub struct Tables {
    pub states: StateCodes,
    pub geo_rules: GeoRules,
    pub crosswalk: Annotations,
    pub annotations: Annotations,
}

impl Tables {
    /// Load every table named by `config`. Tables that are not configured, or whose files do not
    /// exist, are empty.
    pub fn load(config: &Config) -> Result<Self> {
        let crosswalk = &config.crosswalk;

        Ok(Self {
            states: StateCodes::from_optional_file(config.state_codes.as_ref())?,
            geo_rules: GeoRules::from_optional_file(config.geo_rules.as_ref())?,
            crosswalk: Annotations::from_optional_crosswalk(
                config.accessions.as_ref(),
                &crosswalk.key_column,
                &crosswalk.value_column,
                &crosswalk.field,
            )?,
            annotations: Annotations::from_optional_file(config.annotations.as_ref())?,
        })
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Feed lines read, including malformed ones.
    pub read: usize,
    pub malformed: usize,
    pub too_short: usize,
    /// Records sent to the problem table.
    pub problems: usize,
    /// Records dropped because a better record of the same strain was kept.
    pub duplicates: usize,
    /// Rows in the metadata table, which is also the number of FASTA records.
    pub written: usize,
}

/// The first-pass graph, in the order the ops must run.
///
/// `keep_sequences` leaves the `sequence` field on the records instead of dropping it once the
/// length is known.
pub fn first_pass(
    config: &Config,
    tables: Tables,
    problem_output: TsvWriter,
    keep_sequences: bool,
) -> Result<Graph> {
    let mut graph = Graph::new();

    graph
        .add(RenameFieldsOp::new(config.rename.clone()))
        .add(StandardizeOp::new())
        .add(MinLengthOp::new(config.min_length));
    if !keep_sequences {
        graph.add(DropSequenceOp::new());
    }
    graph
        .add(SetFieldsOp::new(config.hardcoded.clone()).with_format("url", &config.url_template)?)
        .add(StrainNameOp::with_default_rules()?)
        .add(ParseGeographyOp::new(LOCATION, tables.states))
        .add(AbbreviateAuthorsOp::new())
        .add(GeoRulesOp::new(tables.geo_rules))
        .add(AnnotateOp::new(
            config.crosswalk.id_field.as_str(),
            tables.crosswalk,
        ))
        .add(AnnotateOp::new(
            config.annotation_id.as_str(),
            tables.annotations,
        ))
        .add(FillExposureOp::new(config.placeholder.as_str()))
        .add(ProblemRecordsOp::new(problem_output));

    if LevelFilter::current() >= LevelFilter::TRACE {
        graph.add(DbgOp::new());
    }

    Ok(graph)
}

/// Run the whole transform described by `config`.
pub fn run(config: &Config) -> Result<Summary> {
    config.validate()?;
    info!(
        feed = %config.feed.display(),
        sorted_fasta = config.sorted_fasta,
        "starting transform"
    );

    let tables = Tables::load(config)?;
    let problem_output = TsvWriter::from_file(
        &config.problem_data,
        config.problem_columns.clone(),
        config.placeholder.as_str(),
        config.newline,
    )?;
    let mut graph = first_pass(config, tables, problem_output, config.sorted_fasta)?;

    let mut summary = Summary::default();
    let mut stream = graph.stream(InputNdjsonOp::from_file(&config.feed)?, config.on_malformed);
    let records = stream.by_ref().collect::<Result<Vec<_>>>()?;
    summary.read = stream.read();
    summary.malformed = stream.malformed();
    graph.finish()?;

    for (node, removed) in graph.removed_counts() {
        match node {
            "MinLengthOp" => summary.too_short += removed,
            "ProblemRecordsOp" => summary.problems += removed,
            _ => (),
        }
    }

    let (mut records, duplicates) = dedup_by_strain(records);
    summary.duplicates = duplicates;
    summary.written = records.len();

    let mut metadata = TsvWriter::from_file(
        &config.output_metadata,
        config.metadata_columns.clone(),
        config.placeholder.as_str(),
        config.newline,
    )?;

    if config.sorted_fasta {
        let mut fasta = FastaWriter::from_file(&config.output_fasta, config.newline)?;
        for record in &records {
            metadata.write(record)?;
            fasta.write_record(record)?;
        }
        metadata.finish()?;
        fasta.finish()?;
    } else {
        // the second pass yields sequences in feed order, so metadata rows must match it
        records.sort_by_key(|r| r.line_number());
        for record in &records {
            metadata.write(record)?;
        }
        metadata.finish()?;

        let strains = correlation_set(&records);
        drop(records);
        write_sequences(config, strains)?;
    }

    info!(
        read = summary.read,
        malformed = summary.malformed,
        too_short = summary.too_short,
        problems = summary.problems,
        duplicates = summary.duplicates,
        written = summary.written,
        "finished transform"
    );
    Ok(summary)
}

/// Second pass: copy the sequences of the kept line numbers to the FASTA file, in feed order.
fn write_sequences(
    config: &Config,
    strains: std::collections::BTreeMap<usize, String>,
) -> Result<()> {
    let mut graph = Graph::new();
    graph
        .add(LineNumberOp::new(strains))
        .add(OutputFastaOp::new(FastaWriter::from_file(
            &config.output_fasta,
            config.newline,
        )?));

    let source = InputNdjsonOp::from_file(&config.feed)?;
    let mut written = 0usize;
    for record in graph.stream(source, MalformedPolicy::Ignore) {
        record?;
        written += 1;
    }
    graph.finish()?;

    info!("wrote {written} sequences to {}", config.output_fasta.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_record;
    use crate::writers::{Newline, Output};
    use serde_json::json;

    fn curate(config: &Config, tables: Tables, record: serde_json::Value) -> Option<Record> {
        let problems = TsvWriter::new(
            Output::Writer(Box::new(std::io::sink())),
            config.problem_columns.clone(),
            "?",
            Newline::Lf,
        )
        .unwrap();
        let mut graph = first_pass(config, tables, problems, false).unwrap();
        graph.run_one(test_record(1, record)).unwrap()
    }

    #[test]
    fn first_pass_curates_a_record() {
        let mut tables = Tables::default();
        tables.states.insert("CA", "California");

        let r = curate(
            &Config::default(),
            tables,
            json!({
                "genbank_accession": "MT000001",
                "genbank_accession_rev": "MT000001.1",
                "strain": "SARS-CoV-2/human/USA/CA-CZB-1/2020",
                "collected": "2020-03-02",
                "submitted": "2020-04-01T00:00:00Z",
                "location": "USA: CA, San Francisco",
                "region": "North America",
                "authors": "Smith,J., Doe,A.",
                "length": 29800,
                "sequence": "ACGT",
            }),
        )
        .unwrap();

        assert_eq!(r.get_str("strain"), Some("USA/CA-CZB-1/2020"));
        assert_eq!(r.get_str("date"), Some("2020-03-02"));
        assert_eq!(r.get_str("date_submitted"), Some("2020-04-01"));
        assert_eq!(r.get_str("country"), Some("USA"));
        assert_eq!(r.get_str("division"), Some("California"));
        assert_eq!(r.get_str("location"), Some("San Francisco"));
        assert_eq!(r.get_str("authors"), Some("Smith et al"));
        assert_eq!(r.get_str("virus"), Some("ncov"));
        assert_eq!(
            r.get_str("url"),
            Some("https://www.ncbi.nlm.nih.gov/nuccore/MT000001")
        );
        assert_eq!(r.get_str("country_exposure"), Some("USA"));
        assert!(!r.contains("sequence"));
    }

    #[test]
    fn first_pass_removes_short_and_problem_records() {
        let short = json!({"strain": "USA/A/2020", "region": "x", "location": "USA", "length": 10});
        assert!(curate(&Config::default(), Tables::default(), short).is_none());

        let no_region = json!({"strain": "USA/A/2020", "location": "USA", "length": 20000});
        assert!(curate(&Config::default(), Tables::default(), no_region).is_none());
    }
}
