//! Conditional column groups.

use serde::Serialize;

/// Separator between a group prefix and its sub-field names.
pub const SEPARATOR: char = '_';

/// A family of columns sharing a prefix.
///
/// When any column under `prefix` is non-null in a row, every anchor
/// (`{prefix}_{anchor}`) must be present and non-null in that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionalGroup {
    pub prefix: &'static str,
    pub anchors: &'static [&'static str],
}

impl ConditionalGroup {
    /// Returns true when `column` belongs to this group.
    pub fn contains(&self, column: &str) -> bool {
        column
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .is_some_and(|field| !field.is_empty())
    }

    /// Full column names of the anchors.
    pub fn anchor_columns(&self) -> impl Iterator<Item = String> + '_ {
        self.anchors
            .iter()
            .map(move |anchor| format!("{}{SEPARATOR}{anchor}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: ConditionalGroup = ConditionalGroup {
        prefix: "personal_address_primary",
        anchors: &["addressTypeId"],
    };

    #[test]
    fn test_contains_requires_separator() {
        assert!(ADDRESS.contains("personal_address_primary_city"));
        assert!(!ADDRESS.contains("personal_address_primary"));
        assert!(!ADDRESS.contains("personal_address_primary_"));
        assert!(!ADDRESS.contains("personal_address_primaryCity"));
        assert!(!ADDRESS.contains("personal_lastName"));
    }

    #[test]
    fn test_anchor_columns_are_prefixed() {
        let anchors: Vec<String> = ADDRESS.anchor_columns().collect();
        assert_eq!(anchors, vec!["personal_address_primary_addressTypeId"]);
    }
}
