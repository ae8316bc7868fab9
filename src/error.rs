use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyCsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 decode error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed COPY block at line {line}: {reason}")]
    MalformedBlock { line: usize, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, CopyCsvError>;
