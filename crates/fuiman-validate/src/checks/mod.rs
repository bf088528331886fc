//! Validation checks.
//!
//! Every check reads the same decoded view of the frame and returns the
//! issues it found. No check stops another from running.

pub mod format;
pub mod groups;
pub mod presence;
pub mod structure;
pub mod types;
pub mod unique;

use std::collections::BTreeMap;

use fuiman_ingest::{Cell, CellReader};
use fuiman_schema::SchemaDefinition;
use polars::prelude::DataFrame;
use tracing::{debug, warn};

use super::issue::Issue;

/// Decoded columns of a frame, in header order.
#[derive(Debug)]
pub struct DecodedFrame {
    pub height: usize,
    pub header: Vec<String>,
    cells: BTreeMap<String, Vec<Cell>>,
}

impl DecodedFrame {
    pub fn decode(df: &DataFrame) -> Self {
        let reader = CellReader::new(df);
        let header = reader.column_names();
        let mut cells = BTreeMap::new();
        for name in &header {
            match reader.cells(name) {
                Ok(values) => {
                    cells.insert(name.clone(), values);
                }
                Err(err) => warn!(column = %name, error = %err, "Could not decode column"),
            }
        }
        Self {
            height: reader.height(),
            header,
            cells,
        }
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.cells.get(name).map(Vec::as_slice)
    }
}

/// Runs every check against a frame.
pub fn run_all(schema: &SchemaDefinition, df: &DataFrame) -> Vec<Issue> {
    let frame = DecodedFrame::decode(df);
    debug!(
        schema = schema.name,
        rows = frame.height,
        columns = frame.header.len(),
        "Validating frame"
    );

    let mut issues = Vec::new();
    issues.extend(structure::check(schema, &frame));
    for rule in schema.columns {
        let Some(cells) = frame.column(rule.name) else {
            continue;
        };
        issues.extend(presence::check(rule, cells));
        issues.extend(unique::check(rule, cells));
        issues.extend(types::check(rule, cells));
        issues.extend(format::check(rule, cells, schema.list_delimiter));
    }
    issues.extend(groups::check(schema, &frame));
    issues
}
