//! Column rule definitions.

use serde::Serialize;
use std::fmt;

/// Logical type of an input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Free text. Any scalar cell is accepted and sent as a string.
    String,
    /// `true`/`false`.
    Boolean,
    /// ISO 8601 date or date-time.
    DateTime,
    /// Delimiter-joined list of strings.
    List,
    /// Embedded JSON object text.
    Structured,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "date-time",
            ColumnType::List => "list",
            ColumnType::Structured => "structured",
        }
    }

    /// Cells of this type are parsed from their raw text.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::List | ColumnType::Structured
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniqueness scope of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Uniqueness {
    #[default]
    None,
    /// No two non-null cells in the column may be equal.
    Column,
}

/// Format constraint applied to each non-null cell (or each list item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatRule {
    /// Canonical UUID, version nibble 1-5 and variant nibble 8/9/a/b.
    Uuid,
    /// Value must be one of the listed strings (case-sensitive).
    OneOf(&'static [&'static str]),
    /// Rough `local@domain.tld` shape.
    Email,
    /// Absolute http or https URL.
    Url,
}

impl FormatRule {
    /// Short rule name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            FormatRule::Uuid => "uuid",
            FormatRule::OneOf(_) => "isin",
            FormatRule::Email => "email",
            FormatRule::Url => "url",
        }
    }
}

/// One recognised column of the import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRule {
    pub name: &'static str,
    pub column_type: ColumnType,
    /// Column must appear in the header.
    pub required: bool,
    /// Cells may be empty.
    pub nullable: bool,
    pub uniqueness: Uniqueness,
    pub format: Option<FormatRule>,
    /// List items must not repeat within a cell. Only meaningful for lists.
    pub unique_items: bool,
}

impl ColumnRule {
    const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            required: false,
            nullable: true,
            uniqueness: Uniqueness::None,
            format: None,
            unique_items: false,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    pub const fn datetime(name: &'static str) -> Self {
        Self::new(name, ColumnType::DateTime)
    }

    pub const fn list(name: &'static str) -> Self {
        Self::new(name, ColumnType::List)
    }

    pub const fn structured(name: &'static str) -> Self {
        Self::new(name, ColumnType::Structured)
    }

    /// Required columns are also non-nullable.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self.nullable = false;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.uniqueness = Uniqueness::Column;
        self
    }

    pub const fn format(mut self, format: FormatRule) -> Self {
        self.format = Some(format);
        self
    }

    pub const fn unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    pub fn is_unique(&self) -> bool {
        self.uniqueness == Uniqueness::Column
    }
}
