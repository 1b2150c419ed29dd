//! Rendering of query results on stdout.

use std::io::Write;

use anyhow::Result;
use sfbulk::{QueryOutput, core::Record};

/// Accumulates query pages and writes them in their output format.
///
/// Tabular pages stream as CSV, with the header taken from the first
/// non-empty page. Keyed records are collected and printed as one JSON array.
pub struct QueryPrinter<W: Write> {
    csv: csv::Writer<W>,
    header_written: bool,
    records: Vec<Record>,
}

impl<W: Write> QueryPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            csv: csv::Writer::from_writer(out),
            header_written: false,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, output: QueryOutput) -> Result<()> {
        match output {
            QueryOutput::Tabular { header, rows } => {
                if !self.header_written && !header.is_empty() {
                    self.csv.write_record(&header)?;
                    self.header_written = true;
                }
                for row in rows {
                    self.csv
                        .write_record(row.iter().map(|value| value.to_string()))?;
                }
            }
            QueryOutput::Records(records) => self.records.extend(records),
        }
        Ok(())
    }

    pub fn finish(self) -> Result<W> {
        let mut out = self.csv.into_inner().map_err(|e| e.into_error())?;
        if !self.records.is_empty() {
            let text = serde_json::to_string_pretty(&self.records)?;
            writeln!(out, "{text}")?;
        }
        out.flush()?;
        Ok(out)
    }
}
