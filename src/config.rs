use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{CopyCsvError, Result};

pub const DEFAULT_SOURCE_PATH: &str = "backups/postgres-dump/data-only.sql";
pub const DEFAULT_OUTPUT_DIR: &str = "backups/csv-files";
pub const DEFAULT_SCHEMA: &str = "public";

/// Record terminator used by the CSV writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

impl FromStr for LineTerminator {
    type Err = CopyCsvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lf" | "unix" => Ok(LineTerminator::Lf),
            "crlf" | "windows" => Ok(LineTerminator::Crlf),
            other => Err(CopyCsvError::InvalidParameter(format!(
                "unknown line terminator '{}', expected lf or crlf",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    /// Schema qualifier that COPY statements must carry, e.g. `public`.
    pub schema: String,
    /// Fail on malformed COPY blocks instead of skipping them.
    pub strict: bool,
    pub line_terminator: LineTerminator,
}

impl ConvertConfig {
    pub fn new(source_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: output_dir.into(),
            schema: DEFAULT_SCHEMA.to_string(),
            strict: false,
            line_terminator: LineTerminator::Lf,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_line_terminator(mut self, line_terminator: LineTerminator) -> Self {
        self.line_terminator = line_terminator;
        self
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_PATH, DEFAULT_OUTPUT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_terminator_parse() {
        assert_eq!("lf".parse::<LineTerminator>().unwrap(), LineTerminator::Lf);
        assert_eq!("CRLF".parse::<LineTerminator>().unwrap(), LineTerminator::Crlf);
        assert!(matches!(
            "cr".parse::<LineTerminator>(),
            Err(CopyCsvError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_default_config_uses_historical_paths() {
        let config = ConvertConfig::default();
        assert_eq!(config.source_path, PathBuf::from(DEFAULT_SOURCE_PATH));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.schema, "public");
        assert!(!config.strict);
        assert_eq!(config.line_terminator, LineTerminator::Lf);
    }
}
