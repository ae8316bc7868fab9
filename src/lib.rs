pub mod config;
pub mod error;
pub mod exporter;
pub mod parser;
pub mod report;
pub mod source;
pub mod types;

use tracing::debug;

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::exporter::{CsvExporter, ExportedTable};
use crate::parser::DumpParser;
use crate::report::{ProgressEvent, Reporter};

/// Run the whole conversion: read the dump, parse its COPY blocks and write
/// one CSV per non-empty table.
///
/// The dump is read before the output directory is touched, so a missing or
/// undecodable source produces no output at all.
pub fn convert(config: &ConvertConfig, reporter: &mut dyn Reporter) -> Result<Vec<ExportedTable>> {
    reporter.report(&ProgressEvent::ConversionStarted {
        source: config.source_path.clone(),
    });

    let parser = DumpParser::new(&config.schema, config.strict)?;
    let dump = source::read_dump(&config.source_path)?;
    let tables = parser.parse(&dump)?;
    debug!(tables = tables.len(), strict = parser.is_strict(), "parsed dump");

    let exported = CsvExporter::new(&config.output_dir)
        .with_line_terminator(config.line_terminator)
        .export(&tables, reporter)?;

    reporter.report(&ProgressEvent::ConversionFinished {
        output_dir: config.output_dir.clone(),
    });
    Ok(exported)
}
