pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error opening or reading file \"{file}\": {source}")]
    FileIo {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Error writing output: {0}")]
    BytesIo(Box<dyn std::error::Error + Send + Sync>),
    #[error("Error parsing line {line} of {origin}: {source}")]
    ParseRecord {
        origin: String,
        line: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Error parsing line {line} of table \"{file}\": {reason}")]
    ParseTable {
        file: String,
        line: usize,
        reason: String,
    },
    #[error("Unexpected geography string \"{string}\" on line {line_number}, expected \"country[: division[, location]]\"")]
    GeographyShape { string: String, line_number: usize },
    #[error("Error in {context} for the record on line {line_number}: {reason}")]
    Record {
        line_number: usize,
        context: &'static str,
        reason: String,
    },
    #[error("{node} removed the record on line {line_number}, but transforms must keep every record")]
    TransformDropped {
        node: &'static str,
        line_number: usize,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn file_io(
        file: impl AsRef<std::path::Path>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::FileIo {
            file: file.as_ref().display().to_string(),
            source: Box::new(source),
        }
    }
}
