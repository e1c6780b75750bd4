//! Flat section records as they appear in a cfg file

use serde::{Deserialize, Serialize};

/// Name given to a heading with no text.
pub const COMMON_SECTION: &str = "__common__";

/// Sibling section skipped whenever another sibling was included.
pub const EXCLUSIVE_SECTION: &str = "__exc__";

/// Full-name prefix of sections that can be renamed from the selector.
pub const SUBSTITUTION_PREFIX: &str = "__sub__";

/// Whether a section name is wrapped in the double-underscore sentinel.
///
/// Common sections are included in every resolution unless excluded.
pub fn is_common_name(name: &str) -> bool {
    name.len() >= 4 && name.starts_with("__") && name.ends_with("__")
}

/// One heading of a cfg file and the half-open line range it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Heading text, possibly a template.
    pub name: String,
    /// Line of the heading itself.
    pub start_line: usize,
    /// First line after the section body.
    pub end_line: usize,
    /// Number of leading `#` minus one.
    pub level: usize,
    /// Shared by all sections expanded from one template, 0 otherwise.
    pub template_id: u32,
}

impl SectionRecord {
    pub fn new(name: impl Into<String>, start_line: usize, end_line: usize, level: usize) -> Self {
        Self {
            name: name.into(),
            start_line,
            end_line,
            level,
            template_id: 0,
        }
    }

    /// Copy of this record under another name and template group.
    pub fn renamed(&self, name: impl Into<String>, template_id: u32) -> Self {
        Self {
            name: name.into(),
            template_id,
            ..self.clone()
        }
    }

    pub fn is_common(&self) -> bool {
        is_common_name(&self.name)
    }
}
