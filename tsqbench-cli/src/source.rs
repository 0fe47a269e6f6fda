//! CSV Query Source
//!
//! Streams `QueryParam` records from a CSV file or standard input. The
//! expected schema is a `hostname,start_time,end_time` header followed by
//! one row per query; field values pass through as strings.
//!
//! Records are deserialized lazily, so a malformed row in the middle of the
//! file surfaces as a mid-stream source error and the pipeline drains
//! before reporting it.

use anyhow::Context;
use std::fs::File;
use std::io::{self, Read};
use tsqbench_core::{QueryParam, SourceError};

/// A CSV-backed producer of query parameters.
pub struct QuerySource {
    reader: csv::Reader<Box<dyn Read + Send>>,
    label: String,
}

impl QuerySource {
    /// Open a CSV source. `-` selects standard input.
    pub fn open(path: &str) -> anyhow::Result<Self> {
        if path == "-" {
            Ok(Self::from_reader(Box::new(io::stdin()), "<stdin>"))
        } else {
            let file = File::open(path)
                .with_context(|| format!("failed to open query file: {}", path))?;
            Ok(Self::from_reader(Box::new(file), path))
        }
    }

    /// Wrap an arbitrary reader; the label shows up in the report.
    pub fn from_reader(reader: Box<dyn Read + Send>, label: impl Into<String>) -> Self {
        Self {
            reader: csv::ReaderBuilder::new().has_headers(true).from_reader(reader),
            label: label.into(),
        }
    }

    /// Human-readable description of where the queries come from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the source, yielding records in file order.
    pub fn records(self) -> impl Iterator<Item = Result<QueryParam, SourceError>> {
        self.reader
            .into_deserialize::<QueryParam>()
            .map(|record| record.map_err(SourceError::from))
    }
}
