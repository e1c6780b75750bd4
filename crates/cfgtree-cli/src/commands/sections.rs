//! Sections command implementation

use std::path::Path;

use cfgtree_fs::NormalizedPath;
use cfgtree_sections::{SectionIndex, read_or_load};
use colored::Colorize;

use crate::error::Result;

/// Run the sections command
pub fn run_sections(file: &Path, use_cache: bool) -> Result<()> {
    let path = NormalizedPath::new(file);
    let index = read_or_load(&path, use_cache)?;

    println!("{} {}", "Sections of".bold(), path.as_str().cyan());
    if index.tree.is_empty() {
        println!("  {}", "None".dimmed());
        return Ok(());
    }
    for line in section_lines(&index) {
        println!("{line}");
    }
    Ok(())
}

/// One line per section: indented name, heading and last line numbers and
/// the template group of expanded sections.
pub fn section_lines(index: &SectionIndex) -> Vec<String> {
    index
        .tree
        .iter()
        .map(|(_, node)| {
            let indent = "  ".repeat(node.level.max(1));
            let start = index.line_number(node.start_line);
            let end = node.end_line.saturating_sub(index.line_offset);
            let mut line = format!("{indent}{}  {start}-{end}", node.name);
            if node.template_id > 0 {
                line.push_str(&format!("  [template {}]", node.template_id));
            }
            line
        })
        .collect()
}
