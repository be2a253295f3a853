use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use genbank_transform::errors::Error;
use genbank_transform::graph::MalformedPolicy;
use genbank_transform::writers::Newline;
use genbank_transform::{run, Config, Summary};

const FEED: &[&str] = &[
    r#"{"genbank_accession": "A1", "genbank_accession_rev": "A1.1", "strain": "hCoV-19/Spain/X-1/2020", "location": "Spain: Catalonia", "region": "Europe", "collected": "2020-03-01", "length": 12, "sequence": "ACGTACGTACGT"}"#,
    r#"{"genbank_accession": "A2", "genbank_accession_rev": "A2.1", "strain": "USA/CA-1/2020", "location": "USA: CA", "region": "North America", "collected": "2020-04", "length": 10, "sequence": "AAAAAAAAAA"}"#,
    r#"{oops"#,
    r#"{"genbank_accession": "A3", "genbank_accession_rev": "A3.1", "strain": "USA/CA-1/2020", "location": "USA: CA", "region": "North America", "collected": "2020", "length": 14, "sequence": "CCCCCCCCCCCCCC"}"#,
    r#"{"genbank_accession": "A4", "genbank_accession_rev": "A4.1", "strain": "Brazil/SP-1/2020", "location": "", "region": "South America", "length": 11, "sequence": "GGGGGGGGGGG"}"#,
    r#"{"genbank_accession": "A5", "genbank_accession_rev": "A5.1", "strain": "China/short/2020", "location": "China", "region": "Asia", "length": 5, "sequence": "TTTTT"}"#,
    r#"{"genbank_accession": "A6", "genbank_accession_rev": "A6.1", "strain": "Argentina/BA-1/2020", "location": "Argentina", "region": "South America", "submitted": "2021-01-05T10:00:00Z", "collected": "2021-01-05", "length": 10, "sequence": "ACACACACAC"}"#,
];

const HEADER: &str = "strain\tgisaid_epi_isl\tgenbank_accession\tdate\tcountry\tdivision\tlength\n";
const SPAIN: &str = "Spain/X-1/2020\tEPI_ISL_1\tA1\t2020-03-01\tSpain\tCatalunya\t12\n";
const USA: &str = "USA/CA-1/2020\t?\tA3\t2020-02-15\tUSA\tCalifornia\t14\n";
const ARGENTINA: &str = "Argentina/BA-1/2020\t?\tA6\t2021-01-05\tArgentina\t\t10\n";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn fixture(dir: &TempDir) -> Config {
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();

    let mut config = Config::default();
    config.feed = write(&input, "genbank.ndjson", &(FEED.join("\n") + "\n"));
    config.geo_rules = Some(write(
        &input,
        "geo_rules.tsv",
        "# region/country/division/location\nEurope/Spain/Catalonia/\tEurope/Spain/Catalunya/\n",
    ));
    config.annotations = Some(write(&input, "annotations.tsv", "A3\tdate\t2020-02-15\n"));
    config.accessions = Some(write(
        &input,
        "accessions.tsv",
        "genbank_accession_rev\tgisaid_epi_isl\nA1.1\tEPI_ISL_1\nA3.1\t\n",
    ));
    config.state_codes = Some(write(&input, "state_codes.tsv", "CA\tCalifornia\nWA\tWashington\n"));

    let output = dir.path().join("output");
    config.output_metadata = output.join("metadata.tsv");
    config.output_fasta = output.join("sequences.fasta");
    config.problem_data = output.join("problem_data.tsv");

    config.min_length = 10;
    config.newline = Newline::Lf;
    config.metadata_columns = [
        "strain",
        "gisaid_epi_isl",
        "genbank_accession",
        "date",
        "country",
        "division",
        "length",
    ]
    .map(String::from)
    .to_vec();
    config
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn streaming_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(&dir);

    let summary = run(&config).unwrap();

    assert_eq!(
        summary,
        Summary {
            read: 7,
            malformed: 1,
            too_short: 1,
            problems: 1,
            duplicates: 1,
            written: 3,
        }
    );
    assert_eq!(
        read(&config.output_metadata),
        [HEADER, SPAIN, USA, ARGENTINA].concat()
    );
    assert_eq!(
        read(&config.output_fasta),
        ">Spain/X-1/2020\nACGTACGTACGT\n>USA/CA-1/2020\nCCCCCCCCCCCCCC\n>Argentina/BA-1/2020\nACACACACAC\n"
    );
    assert_eq!(
        read(&config.problem_data),
        "genbank_accession\tstrain\tregion\tcountry\turl\n\
         A4\tBrazil/SP-1/2020\tSouth America\t\thttps://www.ncbi.nlm.nih.gov/nuccore/A4\n"
    );
}

#[test]
fn sorted_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(&dir);
    config.sorted_fasta = true;

    let summary = run(&config).unwrap();

    assert_eq!(summary.written, 3);
    assert_eq!(
        read(&config.output_metadata),
        [HEADER, ARGENTINA, SPAIN, USA].concat()
    );
    assert_eq!(
        read(&config.output_fasta),
        ">Argentina/BA-1/2020\nACACACACAC\n>Spain/X-1/2020\nACGTACGTACGT\n>USA/CA-1/2020\nCCCCCCCCCCCCCC\n"
    );
}

#[test]
fn metadata_and_fasta_agree() {
    for sorted_fasta in [false, true] {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture(&dir);
        config.sorted_fasta = sorted_fasta;
        run(&config).unwrap();

        let metadata = read(&config.output_metadata);
        let from_metadata = metadata
            .lines()
            .skip(1)
            .map(|l| l.split('\t').next().unwrap().to_owned())
            .collect::<Vec<_>>();
        let fasta = read(&config.output_fasta);
        let from_fasta = fasta
            .lines()
            .filter_map(|l| l.strip_prefix('>'))
            .map(str::to_owned)
            .collect::<Vec<_>>();

        assert_eq!(from_metadata, from_fasta);
    }
}

#[test]
fn reruns_are_byte_identical() {
    let outputs = |config: &Config| {
        run(config).unwrap();
        [
            fs::read(&config.output_metadata).unwrap(),
            fs::read(&config.output_fasta).unwrap(),
            fs::read(&config.problem_data).unwrap(),
        ]
    };

    let dir = tempfile::tempdir().unwrap();
    let config = fixture(&dir);
    let first = outputs(&config);
    let second = outputs(&config);

    assert_eq!(first, second);
}

#[test]
fn gzipped_feed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(&dir);

    let gz = dir.path().join("input").join("genbank.ndjson.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&gz).unwrap(), Compression::default());
    encoder.write_all(&fs::read(&config.feed).unwrap()).unwrap();
    encoder.finish().unwrap();
    config.feed = gz;

    run(&config).unwrap();

    assert_eq!(
        read(&config.output_metadata),
        [HEADER, SPAIN, USA, ARGENTINA].concat()
    );
}

#[test]
fn gzipped_outputs() {
    let gunzip = |path: &Path| {
        let mut text = String::new();
        GzDecoder::new(fs::File::open(path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        text
    };

    for sorted_fasta in [false, true] {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture(&dir);
        let output = dir.path().join("gz");
        config.output_metadata = output.join("metadata.tsv.gz");
        config.output_fasta = output.join("sequences.fasta.gz");
        config.problem_data = output.join("problem_data.tsv.gz");
        config.sorted_fasta = sorted_fasta;

        run(&config).unwrap();

        let metadata = gunzip(&config.output_metadata);
        assert!(metadata.starts_with(HEADER));
        assert_eq!(metadata.lines().count(), 4);
        assert!(metadata.contains(USA));

        let fasta = gunzip(&config.output_fasta);
        assert_eq!(fasta.lines().count(), 6);
        assert!(fasta.contains(">USA/CA-1/2020\nCCCCCCCCCCCCCC\n"));

        assert!(gunzip(&config.problem_data).contains("A4\tBrazil/SP-1/2020"));
    }
}

#[test]
fn missing_tables_mean_no_curation() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(&dir);
    config.geo_rules = Some(dir.path().join("nope.tsv"));
    config.annotations = None;
    config.accessions = None;

    run(&config).unwrap();

    let metadata = read(&config.output_metadata);
    assert!(metadata.contains("Spain/X-1/2020\t?\tA1\t2020-03-01\tSpain\tCatalonia\t12\n"));
    assert!(metadata.contains("USA/CA-1/2020\t?\tA3\t2020-XX-XX\tUSA\tCalifornia\t14\n"));
}

#[test]
fn strict_runs_stop_at_malformed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(&dir);
    config.on_malformed = MalformedPolicy::Fail;

    assert!(matches!(
        run(&config),
        Err(Error::ParseRecord { line: 3, .. })
    ));
}

#[test]
fn unexpected_geography_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(&dir);
    config.feed = write(
        dir.path(),
        "bad_geo.ndjson",
        r#"{"strain": "USA/A/2020", "location": "USA: WA, King, Seattle", "region": "North America", "length": 20}"#,
    );

    assert!(matches!(
        run(&config),
        Err(Error::GeographyShape { line_number: 1, .. })
    ));
}

#[test]
fn missing_feed_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(&dir);
    config.feed = dir.path().join("missing.ndjson");

    assert!(matches!(run(&config), Err(Error::FileIo { .. })));
}
