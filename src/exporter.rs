use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::{debug, warn};

use crate::config::LineTerminator;
use crate::error::Result;
use crate::report::{ProgressEvent, Reporter};
use crate::types::{ParsedTable, TableSet};

/// PostgreSQL COPY text representation of SQL NULL.
pub const NULL_SENTINEL: &str = "\\N";

/// Summary of one written CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTable {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Map the NULL sentinel to an empty cell; everything else passes through.
pub fn normalize_null(cell: &str) -> &str {
    if cell == NULL_SENTINEL {
        ""
    } else {
        cell
    }
}

fn escapes_output_dir(table_name: &str) -> bool {
    table_name.contains('/') || table_name.contains('\\') || table_name.contains("..")
}

/// Writes one `<table>.csv` per table into an output directory.
pub struct CsvExporter {
    output_dir: PathBuf,
    line_terminator: LineTerminator,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            line_terminator: LineTerminator::Lf,
        }
    }

    pub fn with_line_terminator(mut self, line_terminator: LineTerminator) -> Self {
        self.line_terminator = line_terminator;
        self
    }

    /// Destination of a table's CSV file.
    ///
    /// The table name is joined as-is, so a quoted name containing path
    /// separators or `..` resolves outside a flat `<output_dir>/<table>.csv`.
    /// Such names are written where they point (or fail with an IO error) and
    /// are flagged with a warning.
    pub fn table_path(&self, table_name: &str) -> PathBuf {
        if escapes_output_dir(table_name) {
            warn!(table = %table_name, "table name contains path components");
        }
        self.output_dir.join(format!("{}.csv", table_name))
    }

    /// Export every table in order, one file fully written before the next.
    pub fn export(
        &self,
        tables: &TableSet,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<ExportedTable>> {
        fs::create_dir_all(&self.output_dir)?;

        reporter.report(&ProgressEvent::ExportStarted {
            table_count: tables.len(),
        });

        let mut exported = Vec::with_capacity(tables.len());
        for table in tables {
            let path = self.table_path(&table.name);
            self.write_table(table, &path)?;
            debug!(table = %table.name, rows = table.row_count(), path = %path.display(), "wrote CSV");

            reporter.report(&ProgressEvent::TableExported {
                table: table.name.clone(),
                rows: table.row_count(),
                path: path.clone(),
            });
            exported.push(ExportedTable {
                name: table.name.clone(),
                rows: table.row_count(),
                path,
            });
        }

        Ok(exported)
    }

    fn write_table(&self, table: &ParsedTable, path: &Path) -> Result<()> {
        let terminator = match self.line_terminator {
            LineTerminator::Lf => Terminator::Any(b'\n'),
            LineTerminator::Crlf => Terminator::CRLF,
        };
        let file = BufWriter::new(File::create(path)?);
        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .double_quote(true)
            .quote_style(QuoteStyle::Necessary)
            .flexible(true)
            .terminator(terminator)
            .from_writer(file);

        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| normalize_null(cell)))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Export with default writer settings.
pub fn export(
    tables: &TableSet,
    output_dir: impl Into<PathBuf>,
    reporter: &mut dyn Reporter,
) -> Result<Vec<ExportedTable>> {
    CsvExporter::new(output_dir).export(tables, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null() {
        assert_eq!(normalize_null("\\N"), "");
        assert_eq!(normalize_null("Alice"), "Alice");
        assert_eq!(normalize_null("a\\Nb"), "a\\Nb");
        assert_eq!(normalize_null("\\N "), "\\N ");
        assert_eq!(normalize_null("\\n"), "\\n");
        assert_eq!(normalize_null(""), "");
    }

    #[test]
    fn test_escapes_output_dir() {
        assert!(escapes_output_dir("../x"));
        assert!(escapes_output_dir("a/b"));
        assert!(escapes_output_dir("a\\b"));
        assert!(!escapes_output_dir("users"));
        assert!(!escapes_output_dir("order.items"));
    }

    #[test]
    fn test_table_path() {
        let exporter = CsvExporter::new("out");
        assert_eq!(exporter.table_path("users"), PathBuf::from("out").join("users.csv"));
    }
}
