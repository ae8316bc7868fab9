use regex::Regex;
use tracing::debug;

use crate::config::DEFAULT_SCHEMA;
use crate::error::{CopyCsvError, Result};
use crate::types::{ParsedTable, TableSet};

/// Extracts `COPY <schema>.<table> (...) FROM stdin; ... \.` blocks from a
/// plain-text dump.
///
/// In permissive mode anything that does not look like a complete block is
/// skipped. In strict mode a truncated COPY statement, a header that spills
/// past its own line or a row whose width differs from the column list fails
/// with `MalformedBlock`.
pub struct DumpParser {
    copy_re: Regex,
    copy_prefix: String,
    strict: bool,
}

impl DumpParser {
    pub fn new(schema: &str, strict: bool) -> Result<Self> {
        let pattern = format!(
            r"(?s)COPY {}\.(\S+)\s*\(([^)]+)\)\s+FROM stdin;(.*?)\n\\\.(?:\r?\n|\z)",
            regex::escape(schema)
        );
        let copy_re = Regex::new(&pattern)
            .map_err(|e| CopyCsvError::InvalidParameter(format!("schema '{}': {}", schema, e)))?;

        Ok(Self {
            copy_re,
            copy_prefix: format!("COPY {}.", schema),
            strict,
        })
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Parse the full dump text into tables, in first-occurrence order.
    pub fn parse(&self, dump_text: &str) -> Result<TableSet> {
        let mut tables = TableSet::new();
        let mut spans = Vec::new();
        let mut lines = LineCounter::new(dump_text);

        for caps in self.copy_re.captures_iter(dump_text) {
            let whole = caps.get(0).unwrap();
            let segment = caps.get(3).unwrap();
            spans.push((whole.start(), whole.end()));

            let name = caps[1].trim_matches('"').to_string();
            let columns: Vec<String> = caps[2].split(',').map(|c| c.trim().to_string()).collect();

            if self.strict {
                let header = &dump_text[whole.start()..segment.start()];
                if header.contains('\n') {
                    return Err(CopyCsvError::MalformedBlock {
                        line: lines.line_at(whole.start()),
                        reason: "COPY statement column list is not closed on its own line"
                            .to_string(),
                    });
                }
            }

            let first_line = lines.line_at(segment.start());
            let rows = self.parse_rows(segment.as_str(), first_line, columns.len())?;

            if rows.is_empty() {
                debug!(table = %name, "skipping COPY block without data rows");
                continue;
            }

            debug!(table = %name, columns = columns.len(), rows = rows.len(), "parsed COPY block");
            if tables.insert(ParsedTable { name, columns, rows }).is_some() {
                debug!("table appeared in more than one COPY block, keeping the last");
            }
        }

        if self.strict {
            self.check_unmatched(dump_text, &spans)?;
        }

        Ok(tables)
    }

    fn parse_rows(
        &self,
        segment: &str,
        first_line: usize,
        column_count: usize,
    ) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();

        for (offset, line) in segment.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }

            if self.strict {
                if line.starts_with(&self.copy_prefix) && line.ends_with("FROM stdin;") {
                    return Err(CopyCsvError::MalformedBlock {
                        line: first_line + offset,
                        reason: "previous COPY block is missing its \\. terminator".to_string(),
                    });
                }
                let cells = line.split('\t').count();
                if cells != column_count {
                    return Err(CopyCsvError::MalformedBlock {
                        line: first_line + offset,
                        reason: format!("expected {} cells, found {}", column_count, cells),
                    });
                }
            }

            rows.push(line.split('\t').map(str::to_string).collect());
        }

        Ok(rows)
    }

    /// Reject COPY statements that lie outside every matched block.
    fn check_unmatched(&self, dump_text: &str, spans: &[(usize, usize)]) -> Result<()> {
        let mut offset = 0;
        let mut span_idx = 0;

        for (idx, line) in dump_text.split('\n').enumerate() {
            let start = offset;
            offset += line.len() + 1;

            if !line.starts_with(&self.copy_prefix) {
                continue;
            }
            while span_idx < spans.len() && spans[span_idx].1 <= start {
                span_idx += 1;
            }
            let covered = spans
                .get(span_idx)
                .is_some_and(|&(s, e)| s <= start && start < e);
            if !covered {
                return Err(CopyCsvError::MalformedBlock {
                    line: idx + 1,
                    reason: "COPY statement does not start a complete \
                             '(columns) FROM stdin; ... \\.' block"
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Parse with the default `public` schema in permissive mode.
pub fn parse(dump_text: &str) -> Result<TableSet> {
    DumpParser::new(DEFAULT_SCHEMA, false)?.parse(dump_text)
}

/// Maps increasing byte offsets to 1-based line numbers without rescanning
/// the text from the start.
struct LineCounter<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, offset: 0, line: 1 }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        self.line += self.text[self.offset..offset]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        self.offset = offset;
        self.line
    }
}
