use std::io::{self, Write};
use std::path::PathBuf;

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    ConversionStarted { source: PathBuf },
    ExportStarted { table_count: usize },
    TableExported { table: String, rows: usize, path: PathBuf },
    ConversionFinished { output_dir: PathBuf },
}

/// Sink for progress events emitted by the conversion pipeline.
pub trait Reporter {
    fn report(&mut self, event: &ProgressEvent);
}

/// Writes human-readable progress lines, to stdout by default.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &ProgressEvent) -> io::Result<()> {
        let written = match event {
            ProgressEvent::ConversionStarted { source } => {
                writeln!(self.out, "Converting SQL dump -> CSV ({})...", source.display())
            }
            ProgressEvent::ExportStarted { table_count } => {
                writeln!(self.out, "\nExporting {} tables to CSV...\n", table_count)
            }
            ProgressEvent::TableExported { table, rows, path } => {
                writeln!(self.out, "  {}: {} rows -> {}", table, rows, path.display())
            }
            ProgressEvent::ConversionFinished { output_dir } => {
                writeln!(self.out, "\nAll CSV files saved in: {}/", output_dir.display())?;
                writeln!(self.out, "\nConversion complete.")
            }
        };
        written?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: &ProgressEvent) {
        if let Err(e) = self.write_event(event) {
            warn!(error = %e, "failed to write progress line");
        }
    }
}

impl Reporter for Vec<ProgressEvent> {
    fn report(&mut self, event: &ProgressEvent) {
        self.push(event.clone());
    }
}

pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_reporter_table_line() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.report(&ProgressEvent::TableExported {
            table: "users".to_string(),
            rows: 2,
            path: PathBuf::from("out/users.csv"),
        });
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "  users: 2 rows -> out/users.csv\n");
    }
}
