use thiserror::Error;

/// Pipeline stage, used to identify which processing chain
/// ran out of usable data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Position (TPV) pipeline
    Position,
    /// Satellite visibility (SKY) pipeline
    Sky,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Position => write!(f, "position (TPV)"),
            Self::Sky => write!(f, "sky (SKY)"),
        }
    }
}

/// Errors that may rise while decoding a single line.
/// They are always recovered locally: the line is skipped and reported.
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("line {line}: invalid UTF-8 content: {source}")]
    Utf8 {
        /// 1-based line number
        line: usize,
        source: std::str::Utf8Error,
    },
    #[error("line {line}: {source}")]
    Json {
        /// 1-based line number
        line: usize,
        source: serde_json::Error,
    },
    #[error("line {line}: not a JSON object")]
    NotAnObject {
        /// 1-based line number
        line: usize,
    },
    #[error("line {line}: missing or invalid \"{field}\" field")]
    MissingField {
        /// 1-based line number
        line: usize,
        field: &'static str,
    },
}

impl ParsingError {
    /// Returns the 1-based line number this error relates to
    pub fn line(&self) -> usize {
        match self {
            Self::Utf8 { line, .. } => *line,
            Self::Json { line, .. } => *line,
            Self::NotAnObject { line } => *line,
            Self::MissingField { line, .. } => *line,
        }
    }
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("gzip compressed input requires the flate2 feature")]
    GzipNotSupported,
    #[error("invalid sampling: stride must be at least 1")]
    InvalidSampling,
    #[error("{stage} pipeline: no usable data")]
    EmptyDataset { stage: Stage },
}
