use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use genbank_transform::errors::Error;
use genbank_transform::writers::Newline;
use genbank_transform::Config;

/// Curate a GenBank NDJSON feed into metadata, sequences and a problem table.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// YAML configuration. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Newline-delimited JSON feed, optionally gzipped.
    #[arg(long)]
    feed: Option<PathBuf>,

    #[arg(long)]
    output_metadata: Option<PathBuf>,

    #[arg(long)]
    output_fasta: Option<PathBuf>,

    #[arg(long)]
    problem_data: Option<PathBuf>,

    #[arg(long)]
    geo_rules: Option<PathBuf>,

    #[arg(long)]
    annotations: Option<PathBuf>,

    #[arg(long)]
    accessions: Option<PathBuf>,

    #[arg(long)]
    state_codes: Option<PathBuf>,

    /// Drop records with shorter sequences.
    #[arg(long)]
    min_length: Option<usize>,

    /// Write both outputs sorted by strain, holding sequences in memory.
    #[arg(long)]
    sorted_fasta: bool,

    /// Line endings of every output file.
    #[arg(long, value_parser = ["platform", "lf"])]
    newline: Option<String>,

    /// Stop at the first malformed feed line instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Log more (-v for debug, -vv for every record).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(file) => Config::from_file(file)?,
            None => Config::default(),
        };

        let set = |slot: &mut PathBuf, v: Option<PathBuf>| {
            if let Some(v) = v {
                *slot = v;
            }
        };
        set(&mut config.feed, self.feed);
        set(&mut config.output_metadata, self.output_metadata);
        set(&mut config.output_fasta, self.output_fasta);
        set(&mut config.problem_data, self.problem_data);

        config.geo_rules = self.geo_rules.or(config.geo_rules);
        config.annotations = self.annotations.or(config.annotations);
        config.accessions = self.accessions.or(config.accessions);
        config.state_codes = self.state_codes.or(config.state_codes);

        if let Some(min_length) = self.min_length {
            config.min_length = min_length;
        }
        config.sorted_fasta |= self.sorted_fasta;
        match self.newline.as_deref() {
            Some("lf") => config.newline = Newline::Lf,
            Some("platform") => config.newline = Newline::Platform,
            _ => (),
        }
        if self.strict {
            config.on_malformed = genbank_transform::graph::MalformedPolicy::Fail;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let res = cli
        .into_config()
        .and_then(|config| genbank_transform::run(&config));

    if let Err(e) = res {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e {
            Error::Config(_) => 2,
            Error::FileIo { .. } | Error::BytesIo(_) => 3,
            _ => 1,
        };
        process::exit(exit_code);
    }
}
