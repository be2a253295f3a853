use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde_json::{Map, Value};

use crate::graph::*;

/// Records parsed from a newline-delimited JSON feed, one object per line.
///
/// Each record carries its 1-based line number. A line that does not hold a JSON object yields
/// an [`Error::ParseRecord`] for that line only; iteration carries on with the next line, so the
/// caller picks whether to skip or stop. Opening the same file again starts over from line 1.
pub struct InputNdjsonOp {
    lines: Lines<Box<dyn BufRead>>,
    origin: String,
    line_number: usize,
}

impl InputNdjsonOp {
    /// Stream records from a file. Files ending in `.gz` are decompressed.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let f = File::open(file).map_err(|e| Error::file_io(file, e))?;

        let reader: Box<dyn BufRead> = if file.extension().map_or(false, |e| e == "gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(f)))
        } else {
            Box::new(BufReader::new(f))
        };

        Ok(Self {
            lines: reader.lines(),
            origin: file.display().to_string(),
            line_number: 0,
        })
    }

    /// Stream records from an arbitrary `Read`er.
    pub fn from_reader(reader: impl std::io::Read + 'static) -> Self {
        let reader: Box<dyn BufRead> = Box::new(BufReader::new(reader));

        Self {
            lines: reader.lines(),
            origin: "<reader>".to_owned(),
            line_number: 0,
        }
    }

    fn parse(&self, line: &str) -> Result<Record> {
        let fields = serde_json::from_str::<Map<String, Value>>(line).map_err(|e| {
            Error::ParseRecord {
                origin: self.origin.clone(),
                line: self.line_number,
                source: Box::new(e),
            }
        })?;

        Ok(Record::new(self.line_number, fields))
    }
}

impl Iterator for InputNdjsonOp {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_number += 1;

        Some(match line {
            Ok(line) => self.parse(&line),
            Err(e) => Err(Error::file_io(&self.origin, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn line_numbers_follow_input_lines() {
        let feed = "{\"a\": 1}\nnot json\n{\"a\": 3}\n[1, 2]\n";
        let res = InputNdjsonOp::from_reader(feed.as_bytes()).collect::<Vec<_>>();

        assert_eq!(res.len(), 4);
        assert_eq!(res[0].as_ref().unwrap().line_number(), 1);
        assert!(matches!(res[1], Err(Error::ParseRecord { line: 2, .. })));
        assert_eq!(res[2].as_ref().unwrap().line_number(), 3);
        assert!(matches!(res[3], Err(Error::ParseRecord { line: 4, .. })));
    }

    #[test]
    fn reopening_starts_over() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "{{\"strain\": \"a\"}}").unwrap();
        writeln!(f, "{{\"strain\": \"b\"}}").unwrap();
        f.flush().unwrap();

        let first = InputNdjsonOp::from_file(f.path()).unwrap();
        assert_eq!(first.count(), 2);

        let mut second = InputNdjsonOp::from_file(f.path()).unwrap();
        let r = second.next().unwrap().unwrap();
        assert_eq!(r.line_number(), 1);
        assert_eq!(r.get_str("strain"), Some("a"));
    }

    #[test]
    fn missing_feed_is_an_error() {
        assert!(matches!(
            InputNdjsonOp::from_file("/nonexistent/feed.ndjson"),
            Err(Error::FileIo { .. })
        ));
    }
}
