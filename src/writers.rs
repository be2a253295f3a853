//! Writers for the metadata and problem tables and the FASTA output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::{write::GzEncoder, Compression};
use serde::Deserialize;

use crate::errors::*;
use crate::record::*;

/// Line endings used by every output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    /// `\r\n` on Windows, `\n` elsewhere.
    #[default]
    Platform,
    /// Always `\n`.
    Lf,
}

impl Newline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Platform if cfg!(windows) => "\r\n",
            Newline::Platform => "\n",
        }
    }

    fn terminator(&self) -> csv::Terminator {
        match self.as_str() {
            "\r\n" => csv::Terminator::CRLF,
            _ => csv::Terminator::Any(b'\n'),
        }
    }
}

/// Where an output file's bytes go.
///
/// The gzip variant only becomes a valid gzip stream once [`Output::finish`] has written its
/// trailer.
pub enum Output {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
    Writer(Box<dyn Write>),
}

impl Output {
    /// Flush everything, and end the gzip stream.
    pub fn finish(&mut self) -> std::io::Result<()> {
        match self {
            Output::Plain(w) => w.flush(),
            Output::Gzip(w) => {
                w.flush()?;
                w.get_mut().try_finish()
            }
            Output::Writer(w) => w.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Output::Plain(w) => w.write(buf),
            Output::Gzip(w) => w.write(buf),
            Output::Writer(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Output::Plain(w) => w.flush(),
            Output::Gzip(w) => w.flush(),
            Output::Writer(w) => w.flush(),
        }
    }
}

/// Create an output file, along with its parent directories. Paths ending in `.gz` are gzipped.
pub fn create_file(file: impl AsRef<Path>) -> Result<Output> {
    let file = file.as_ref();

    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::file_io(parent, e))?;
    }

    let f = File::create(file).map_err(|e| Error::file_io(file, e))?;
    let writer = if file.extension().map_or(false, |e| e == "gz") {
        Output::Gzip(BufWriter::new(GzEncoder::new(f, Compression::default())))
    } else {
        Output::Plain(BufWriter::new(f))
    };

    Ok(writer)
}

/// A TSV table with a fixed column list.
///
/// Columns missing from a record are written as the placeholder, null values as empty cells,
/// and fields that are not columns are ignored.
pub struct TsvWriter {
    writer: csv::Writer<Output>,
    columns: Vec<String>,
    placeholder: String,
}

impl TsvWriter {
    /// Start a table and write its header row.
    pub fn new(
        writer: Output,
        columns: Vec<String>,
        placeholder: impl Into<String>,
        newline: Newline,
    ) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(newline.terminator())
            .from_writer(writer);

        writer
            .write_record(&columns)
            .map_err(|e| Error::BytesIo(Box::new(e)))?;

        Ok(Self {
            writer,
            columns,
            placeholder: placeholder.into(),
        })
    }

    pub fn from_file(
        file: impl AsRef<Path>,
        columns: Vec<String>,
        placeholder: impl Into<String>,
        newline: Newline,
    ) -> Result<Self> {
        Self::new(create_file(file)?, columns, placeholder, newline)
    }

    pub fn write(&mut self, record: &Record) -> Result<()> {
        let row = self
            .columns
            .iter()
            .map(|c| record.cell(c, &self.placeholder));

        self.writer
            .write_record(row.map(|c| c.into_owned()))
            .map_err(|e| Error::BytesIo(Box::new(e)))
    }

    /// Write out the remaining rows and close the table.
    pub fn finish(self) -> Result<()> {
        self.writer
            .into_inner()
            .map_err(|e| {
                let e = e.error();
                Error::BytesIo(Box::new(std::io::Error::new(e.kind(), e.to_string())))
            })?
            .finish()
            .map_err(|e| Error::BytesIo(Box::new(e)))
    }
}

/// FASTA output: a `>name` line followed by the sequence on one line.
pub struct FastaWriter {
    writer: Output,
    newline: Newline,
}

impl FastaWriter {
    pub fn new(writer: Output, newline: Newline) -> Self {
        Self { writer, newline }
    }

    pub fn from_file(file: impl AsRef<Path>, newline: Newline) -> Result<Self> {
        Ok(Self::new(create_file(file)?, newline))
    }

    pub fn write(&mut self, name: &str, sequence: &str) -> Result<()> {
        write_fasta_record(&mut self.writer, (name, sequence), self.newline)
            .map_err(|e| Error::BytesIo(Box::new(e)))
    }

    /// Write a record's `strain` and `sequence`.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let missing = |field: &str| Error::Record {
            line_number: record.line_number(),
            context: "writing FASTA",
            reason: format!("no {field}"),
        };

        let strain = record.get_str(STRAIN).ok_or_else(|| missing(STRAIN))?;
        let sequence = record.get_str(SEQUENCE).ok_or_else(|| missing(SEQUENCE))?;
        self.write(strain, sequence)
    }

    /// Write out the remaining records and close the file.
    pub fn finish(&mut self) -> Result<()> {
        self.writer
            .finish()
            .map_err(|e| Error::BytesIo(Box::new(e)))
    }
}

pub fn write_fasta_record(
    writer: &mut dyn Write,
    record: (&str, &str),
    newline: Newline,
) -> std::io::Result<()> {
    writer.write_all(b">")?;
    writer.write_all(record.0.as_bytes())?;
    writer.write_all(newline.as_str().as_bytes())?;
    writer.write_all(record.1.as_bytes())?;
    writer.write_all(newline.as_str().as_bytes())
}
