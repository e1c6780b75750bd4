//! Selection of the sections that apply to a request
//!
//! Resolution works on a private copy of a [`SectionIndex`], since
//! substitution requests rename sections in place.

mod placeholder;
mod report;
mod selector;

pub use placeholder::substitute;
pub use report::{ReportEntry, SectionReport};
pub use selector::{
    CfgPass, RepeatRequest, compose_repeats, plan_entry, plan_passes, split_cfg_list,
};

use crate::{Error, Result};
use cfgtree_sections::{
    EXCLUSIVE_SECTION, NodeId, ROOT, SUBSTITUTION_PREFIX, SectionIndex, is_common_name,
};
use std::collections::{BTreeSet, HashSet};

/// Arguments and report produced for one file pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// `--name=value` arguments in acceptance order.
    pub args: Vec<String>,
    pub report: SectionReport,
}

/// Drop unescaped `-`, unescape `\-`.
fn full_name_key(request: &str) -> String {
    let mut key = String::with_capacity(request.len());
    let mut chars = request.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'-') => {
                key.push('-');
                chars.next();
            }
            '-' => {}
            _ => key.push(c),
        }
    }
    key
}

/// Split at the first unescaped `-`.
fn split_substitution(request: &str) -> Option<(String, String)> {
    let bytes = request.as_bytes();
    let at = (0..bytes.len()).find(|&i| bytes[i] == b'-' && (i == 0 || bytes[i - 1] != b'\\'))?;
    let original = request[..at].replace("\\-", "-");
    let substitute = request[at + 1..].replace("\\-", "-");
    let substitute = substitute
        .strip_prefix("__")
        .and_then(|s| s.strip_suffix("__"))
        .map(str::to_string)
        .unwrap_or(substitute);
    Some((original, substitute))
}

/// Nodes matched by a request that is not a plain section name.
fn specific_matches(index: &mut SectionIndex, request: &str) -> Result<Vec<NodeId>> {
    let found = index.tree.find_full_name(&full_name_key(request));
    if !found.is_empty() {
        return Ok(found.to_vec());
    }

    let file = index.path.to_string();
    let not_found = || Error::SectionNotFound {
        section: request.to_string(),
        file: file.clone(),
    };
    let (original, substitute) = split_substitution(request).ok_or_else(not_found)?;
    let matches = index
        .tree
        .find_full_name(&format!("{SUBSTITUTION_PREFIX}{original}"))
        .to_vec();
    match matches.as_slice() {
        [] => Err(not_found()),
        [node] => {
            tracing::info!("Substituting section {original} with {substitute}");
            if let Some(seq) = index.tree.node(*node).seq_id {
                index.rename_section(seq, &substitute);
            }
            Ok(vec![*node])
        }
        _ => Err(Error::AmbiguousSubstitution {
            section: request.to_string(),
            file,
            count: matches.len(),
        }),
    }
}

/// Narrow `[start, end)` to its first and last line that is neither blank
/// nor a comment.
fn trim_range(lines: &[String], start: usize, end: usize) -> (usize, usize) {
    let meaningful = |i: &usize| {
        let line = &lines[*i];
        !line.is_empty() && !line.starts_with('#')
    };
    match (start..end).find(meaningful) {
        Some(first) => {
            let last = (first..end).rev().find(meaningful).unwrap_or(first);
            (first, last + 1)
        }
        None => (start, start),
    }
}

/// Resolve `requested` against `index`.
///
/// Common sections are added unless `exclude_common` is set or a `!name`
/// request excludes them.
pub fn resolve_sections(
    index: &SectionIndex,
    requested: &[String],
    exclude_common: bool,
) -> Result<Resolution> {
    let mut index = index.clone();
    let file = index.path.to_string();
    let n = index.sections.len();

    let excluded: HashSet<&str> = requested
        .iter()
        .filter_map(|r| r.strip_prefix('!'))
        .collect();
    if !excluded.is_empty() {
        let mut names: Vec<&str> = excluded.iter().copied().collect();
        names.sort_unstable();
        tracing::info!("Excluding section(s): {}", names.join(", "));
    }

    let common_names: BTreeSet<String> = index
        .sections
        .iter()
        .filter(|s| s.is_common() && !excluded.contains(s.name.as_str()))
        .map(|s| s.name.clone())
        .collect();

    let mut requests: Vec<String> = requested
        .iter()
        .filter(|r| !r.is_empty() && !r.starts_with('!'))
        .cloned()
        .collect();
    if !exclude_common {
        requests.extend(common_names.iter().cloned());
    }
    let mut seen = HashSet::new();
    requests.retain(|r| seen.insert(r.clone()));

    let in_pool = |index: &SectionIndex, name: &str| {
        !excluded.contains(name) && index.sections.iter().any(|s| s.name == name)
    };
    let plain: Vec<bool> = requests.iter().map(|r| in_pool(&index, r)).collect();

    let mut candidates: Vec<(usize, String)> = Vec::new();
    let mut included = vec![false; n];

    for request in requests.iter().zip(&plain).filter(|(_, p)| !**p).map(|(r, _)| r) {
        for node_id in specific_matches(&mut index, request)? {
            let node = index.tree.node(node_id);
            let mut pinned = vec![node_id];
            if let Some(parent) = node.parent.filter(|&p| p != ROOT) {
                pinned.push(parent);
            }
            for id in pinned {
                let node = index.tree.node(id);
                if let Some(seq) = node.seq_id {
                    candidates.push((seq, node.name.clone()));
                    included[seq] = true;
                }
            }
        }
    }

    for request in requests.iter().zip(&plain).filter(|(_, p)| **p).map(|(r, _)| r) {
        for (seq, section) in index.sections.iter().enumerate() {
            if section.name == *request && !excluded.contains(section.name.as_str()) {
                candidates.push((seq, request.clone()));
                included[seq] = true;
            }
        }
    }

    candidates.sort();
    candidates.dedup();

    let tree = &index.tree;
    let seq_of = |id: NodeId| tree.node(id).seq_id;

    let mut accepted = vec![false; n];
    let mut accepted_parents: Vec<Option<usize>> = vec![None];
    let mut skipped_parents: Vec<usize> = Vec::new();
    let mut valid: HashSet<String> = HashSet::new();
    let mut skipped: HashSet<String> = HashSet::new();

    let mut args = Vec::new();
    let mut report = SectionReport::new(file.clone());

    for (seq, name) in &candidates {
        let node_id = tree.node_for_seq(*seq);
        let parent_id = tree.node(node_id).parent.unwrap_or(ROOT);
        let parent_seq = seq_of(parent_id);

        if !accepted_parents.contains(&parent_seq) {
            if parent_seq.is_some_and(|p| skipped_parents.contains(&p)) {
                skipped.insert(name.clone());
                skipped_parents.push(*seq);
            }
            continue;
        }

        if name == EXCLUSIVE_SECTION {
            let blocking = tree.node(parent_id).children.iter().find(|&&sibling| {
                sibling != node_id
                    && seq_of(sibling).is_some_and(|s| {
                        accepted[s] || (included[s] && !tree.node(sibling).is_common)
                    })
            });
            if let Some(&sibling) = blocking {
                tracing::info!(
                    "Skipping exclusive section at line {} in favour of {}",
                    index.line_number(index.sections[*seq].start_line),
                    tree.node(sibling).name
                );
                skipped.insert(name.clone());
                skipped_parents.push(*seq);
                continue;
            }
        }

        accepted_parents.push(Some(*seq));
        accepted[*seq] = true;
        valid.insert(name.clone());

        let record = &index.sections[*seq];
        let raw_start = record.start_line + 1;
        let raw_end = record.end_line.max(raw_start);
        let (start, end) = trim_range(&index.lines, raw_start, raw_end);

        if start >= end {
            if !record.is_common() && raw_start != raw_end {
                return Err(Error::InvalidEmptySection {
                    section: name.clone(),
                    file,
                    start: index.line_number(raw_start),
                    end: raw_end.saturating_sub(index.line_offset),
                });
            }
            tracing::debug!(section = %name, "skipping empty section");
            continue;
        }

        let lines = substitute(tree, node_id, &index.lines[start..end])?;
        args.extend(
            lines
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(|line| format!("--{line}")),
        );

        let (first, last) = (index.line_number(start), index.line_number(end - 1));
        if common_names.contains(name) {
            report.common.push((first, last));
        } else {
            let mut path: Vec<&str> = tree
                .ancestors(node_id)
                .iter()
                .rev()
                .map(|&id| tree.node(id).name.as_str())
                .filter(|ancestor| !common_names.contains(*ancestor))
                .collect();
            path.push(name);
            report.entries.push(ReportEntry {
                path: path.join(":"),
                start: first,
                end: last,
            });
        }
    }

    let mut invalid: Vec<String> = Vec::new();
    for (_, name) in &candidates {
        if !is_common_name(name)
            && !valid.contains(name)
            && !skipped.contains(name)
            && !invalid.contains(name)
        {
            invalid.push(name.clone());
        }
    }
    if !invalid.is_empty() {
        return Err(Error::InvalidSections {
            file,
            sections: invalid,
        });
    }

    Ok(Resolution { args, report })
}
