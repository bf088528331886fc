//! Declarative schema of FOLIO user import files.
//!
//! The schema is pure data: a table of [`ColumnRule`]s, a table of
//! [`ConditionalGroup`]s and the set of deprecated column names. The
//! validator and transformer crates interpret it.

mod column;
mod group;
mod user;

pub use column::{ColumnRule, ColumnType, FormatRule, Uniqueness};
pub use group::{ConditionalGroup, SEPARATOR};
pub use user::{
    ADDRESS_PREFIXES, DEPRECATED_COLUMNS, EMAIL_COMMUNICATION, FULFILLMENT, LIST_DELIMITER,
    PERSONAL_PREFIX, PREFERRED_CONTACT_TYPES, REQUEST_PREFERENCE_PREFIX, USER_IMPORT_SCHEMA,
    USER_TYPES,
};

/// A closed tabular schema.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDefinition {
    pub name: &'static str,
    pub columns: &'static [ColumnRule],
    pub groups: &'static [ConditionalGroup],
    pub deprecated: &'static [&'static str],
    pub list_delimiter: char,
}

impl SchemaDefinition {
    /// Looks up the rule for a column name (case-sensitive).
    pub fn column(&self, name: &str) -> Option<&'static ColumnRule> {
        self.columns.iter().find(|rule| rule.name == name)
    }

    pub fn is_deprecated(&self, name: &str) -> bool {
        self.deprecated.contains(&name)
    }

    /// Columns that must appear in every file.
    pub fn required_columns(self) -> impl Iterator<Item = &'static ColumnRule> {
        self.columns.iter().filter(|rule| rule.required)
    }

    /// Columns whose cells are read verbatim as text: strings, lists and
    /// structured cells. Type inference would drop leading zeros from
    /// identifiers such as `007`.
    pub fn text_columns(self) -> impl Iterator<Item = &'static str> {
        self.columns
            .iter()
            .filter(|rule| rule.column_type.is_text())
            .map(|rule| rule.name)
    }
}
