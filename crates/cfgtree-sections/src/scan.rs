//! Reading cfg files: `%import%` inlining and heading detection

use crate::record::{COMMON_SECTION, SectionRecord};
use crate::{Error, Result};
use cfgtree_fs::{NormalizedPath, io};
use regex::Regex;
use std::sync::LazyLock;

/// A heading line: two or more `#` followed by the section name.
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,})(.*)$").expect("Invalid heading regex"));

/// `%import% <relative path>`
static IMPORT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%import%\s+(\S.*)$").expect("Invalid import regex"));

/// Lines of a cfg file with all imports inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub lines: Vec<String>,
    /// Every file imported directly or transitively, in first-seen order.
    pub imports: Vec<NormalizedPath>,
}

/// Flat section table of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    pub sections: Vec<SectionRecord>,
    /// 1 when a synthetic heading was inserted before the first line.
    pub line_offset: usize,
}

pub(crate) fn file_not_found(path: &NormalizedPath) -> Error {
    Error::FileNotFound {
        path: std::path::absolute(path.to_native()).unwrap_or_else(|_| path.to_native()),
    }
}

/// Read a cfg file, recursively replacing `%import%` lines by the lines of
/// the imported file. Import paths are relative to the importing file.
///
/// Importing a file that is already being read further up the chain is a
/// [`Error::CircularImport`]; importing the same file from two branches is
/// allowed.
pub fn read_source(path: &NormalizedPath) -> Result<Source> {
    if !path.is_file() {
        return Err(file_not_found(path));
    }
    let mut chain = Vec::new();
    let mut imports = Vec::new();
    let lines = read_recursive(path, &mut chain, &mut imports, 0)?;
    Ok(Source { lines, imports })
}

fn read_recursive(
    path: &NormalizedPath,
    chain: &mut Vec<NormalizedPath>,
    imports: &mut Vec<NormalizedPath>,
    depth: usize,
) -> Result<Vec<String>> {
    tracing::info!(depth, "Reading parameters from {path}");
    chain.push(path.canonical());

    let dir = path.parent().unwrap_or_else(|| NormalizedPath::new(""));
    let mut lines = Vec::new();
    for line in io::read_lines(path)? {
        let Some(caps) = IMPORT_REGEX.captures(&line) else {
            lines.push(line);
            continue;
        };

        let imported = dir.join(caps[1].trim());
        if !imported.is_file() {
            return Err(file_not_found(&imported));
        }
        if chain.contains(&imported.canonical()) {
            return Err(Error::CircularImport {
                file: path.to_native(),
                import: imported.to_native(),
            });
        }
        if !imports.contains(&imported) {
            imports.push(imported.clone());
        }
        lines.extend(read_recursive(&imported, chain, imports, depth + 1)?);
    }

    chain.pop();
    Ok(lines)
}

/// Collect the headings of `lines`.
///
/// When the first line is not a heading a bare `##` is inserted, so text
/// before the first heading belongs to a common section. Each section ends
/// where the next one starts.
pub fn scan_sections(lines: &mut Vec<String>) -> Scanned {
    let mut line_offset = 0;
    if !lines.first().is_some_and(|line| HEADING_REGEX.is_match(line)) {
        lines.insert(0, "##".to_string());
        line_offset = 1;
    }

    let mut sections: Vec<SectionRecord> = lines
        .iter()
        .enumerate()
        .filter_map(|(line_id, line)| {
            let caps = HEADING_REGEX.captures(line)?;
            let level = caps[1].len() - 1;
            let name = match caps[2].trim() {
                "" => COMMON_SECTION,
                name => name,
            };
            Some(SectionRecord::new(name, line_id, line_id, level))
        })
        .collect();

    let ends: Vec<usize> = sections
        .iter()
        .skip(1)
        .map(|next| next.start_line)
        .chain([lines.len()])
        .collect();
    for (section, end) in sections.iter_mut().zip(ends) {
        section.end_line = end;
    }

    Scanned {
        sections,
        line_offset,
    }
}
