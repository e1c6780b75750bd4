//! Human-readable account of the sections a resolution used

use serde::Serialize;
use std::fmt;

/// One accepted, non-common section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Ancestral path with common sections left out, `:`-joined.
    pub path: String,
    /// First and last 1-based line number of the section body.
    pub start: usize,
    pub end: usize,
}

/// Sections used while resolving one file pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub file: String,
    pub entries: Vec<ReportEntry>,
    /// Line spans of the accepted common sections.
    pub common: Vec<(usize, usize)>,
}

impl SectionReport {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.common.is_empty()
    }

    /// Accepted section paths, in acceptance order.
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }
}

fn span(start: usize, end: usize) -> String {
    if end > start {
        format!("{start} -> {end}")
    } else {
        start.to_string()
    }
}

impl fmt::Display for SectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}: {}", e.path, span(e.start, e.end)))
            .collect();
        if !self.common.is_empty() {
            let spans: Vec<String> = self.common.iter().map(|&(s, e)| span(s, e)).collect();
            lines.push(format!("common: {}", spans.join(", ")));
        }
        write!(f, "{}", lines.join("\n"))
    }
}
