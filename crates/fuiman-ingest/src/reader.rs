//! Strict and lenient CSV loading.

use std::path::Path;
use std::sync::Arc;

use fuiman_schema::{SchemaDefinition, USER_IMPORT_SCHEMA};
use polars::prelude::{
    CsvReadOptions, DataFrame, DataType, PlSmallStr, Schema, SchemaRef, SerReader,
};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Prefix of comment lines skipped by the parser.
pub const COMMENT_PREFIX: &str = "#";

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Parse tolerance of a read pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Any malformed row fails the read.
    Strict,
    /// Unparsable cells become null and ragged rows are truncated.
    Lenient,
}

impl ReadMode {
    fn tolerant(self) -> bool {
        self == ReadMode::Lenient
    }
}

/// Both read passes over one source.
///
/// A strict failure is a read error for the source. The lenient frame, when
/// present, is still used for schema validation so that both kinds of problem
/// are reported together.
#[derive(Debug)]
pub struct SourceRead {
    pub strict: Result<DataFrame>,
    pub lenient: Result<DataFrame>,
}

impl SourceRead {
    /// Frame to validate against the schema, if any pass succeeded.
    pub fn frame(&self) -> Option<&DataFrame> {
        self.strict.as_ref().ok().or(self.lenient.as_ref().ok())
    }

    /// Strict read error message, if the strict pass failed.
    pub fn read_error(&self) -> Option<String> {
        self.strict.as_ref().err().map(ToString::to_string)
    }
}

/// Reads a source of the user import schema twice, strictly then leniently.
pub fn read_source(path: &Path) -> SourceRead {
    read_source_with_schema(path, USER_IMPORT_SCHEMA)
}

/// Reads a source twice, strictly then leniently.
pub fn read_source_with_schema(path: &Path, schema: SchemaDefinition) -> SourceRead {
    let strict = read_csv(path, schema, ReadMode::Strict);
    let lenient = match &strict {
        // Strict success implies the lenient pass would produce the same frame.
        Ok(df) => Ok(df.clone()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Strict read failed, retrying leniently");
            read_csv(path, schema, ReadMode::Lenient)
        }
    };

    SourceRead { strict, lenient }
}

/// Dtype overrides pinning the schema's text columns to `String`.
///
/// Names absent from a file's header are ignored by the reader.
fn text_overrides(schema: SchemaDefinition) -> SchemaRef {
    Arc::new(Schema::from_iter(
        schema
            .text_columns()
            .map(|name| (PlSmallStr::from_static(name), DataType::String)),
    ))
}

/// Reads a CSV file with a header row, skipping `#` comment lines.
///
/// Text columns of `schema` are kept verbatim; other columns are inferred,
/// with date/time detection.
pub fn read_csv(path: &Path, schema: SchemaDefinition, mode: ReadMode) -> Result<DataFrame> {
    let tolerant = mode.tolerant();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_schema_overwrite(Some(text_overrides(schema)))
        .with_ignore_errors(tolerant)
        .map_parse_options(|opts| {
            opts.with_comment_prefix(Some(COMMENT_PREFIX))
                .with_try_parse_dates(true)
                .with_truncate_ragged_lines(tolerant)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        ?mode,
        rows = df.height(),
        columns = df.width(),
        "Read CSV"
    );

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let file = create_temp_csv("username,externalSystemId\n# a comment\nalice,a-1\n");
        let df = read_csv(file.path(), USER_IMPORT_SCHEMA, ReadMode::Strict).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_dates_are_detected() {
        let file = create_temp_csv("username,enrollmentDate\nalice,2024-01-15\nbob,2024-02-01\n");
        let df = read_csv(file.path(), USER_IMPORT_SCHEMA, ReadMode::Strict).unwrap();
        let dtype = df.column("enrollmentDate").unwrap().dtype().clone();
        assert!(matches!(dtype, DataType::Date | DataType::Datetime(_, _)));
    }

    #[test]
    fn test_identifier_columns_keep_leading_zeros() {
        let file = create_temp_csv(
            "username,externalSystemId,barcode,personal_address_primary_postalCode,active\n\
             007,0001,00123,01002,true\n\
             7,1,123,1.50,false\n",
        );
        let df = read_csv(file.path(), USER_IMPORT_SCHEMA, ReadMode::Strict).unwrap();
        let text = ["username", "externalSystemId", "barcode", "personal_address_primary_postalCode"];
        for name in text {
            assert_eq!(df.column(name).unwrap().dtype(), &DataType::String, "{name}");
        }
        assert_eq!(df.column("active").unwrap().dtype(), &DataType::Boolean);

        let reader = crate::CellReader::new(&df);
        let usernames = reader.cells("username").unwrap();
        assert_eq!(
            usernames,
            vec![crate::Cell::Text("007".into()), crate::Cell::Text("7".into())]
        );
        let postal = reader.cells("personal_address_primary_postalCode").unwrap();
        assert_eq!(postal[0].render(), "01002");
        assert_eq!(postal[1].render(), "1.50");
    }

    #[test]
    fn test_ragged_row_fails_strict_but_not_lenient() {
        let file = create_temp_csv("username,externalSystemId\nalice,a-1\nbob,b-2,extra\n");

        let read = read_source(file.path());
        assert!(read.strict.is_err());
        assert!(read.read_error().is_some());

        let lenient = read.lenient.as_ref().unwrap();
        assert_eq!(lenient.width(), 2);
        assert_eq!(lenient.height(), 2);
        assert!(read.frame().is_some());
    }

    #[test]
    fn test_strict_success_reuses_frame() {
        let file = create_temp_csv("username,externalSystemId\nalice,a-1\n");
        let read = read_source(file.path());
        assert!(read.strict.is_ok());
        assert!(read.lenient.is_ok());
        assert!(read.read_error().is_none());
    }

    #[test]
    fn test_missing_file_fails_both_passes() {
        let dir = tempfile::TempDir::new().unwrap();
        let read = read_source(&dir.path().join("absent.csv"));
        assert!(matches!(read.strict, Err(IngestError::CsvParse { .. })));
        assert!(read.lenient.is_err());
        assert!(read.frame().is_none());
    }
}
