//! Issue categories.

use serde::Serialize;

/// Broad class of a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Header-level problems: missing, unknown and deprecated columns.
    Structure,
    Presence,
    Uniqueness,
    Type,
    Format,
    /// Values outside an enumerated set.
    Terminology,
    /// Conditional group anchors.
    Group,
}

impl Category {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::Presence => "Presence",
            Self::Uniqueness => "Uniqueness",
            Self::Type => "Type",
            Self::Format => "Format",
            Self::Terminology => "Terminology",
            Self::Group => "Conditional Group",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
