//! Template heading expansion
//!
//! A heading is a template when one of its `_`-separated components starts
//! with a range or list marker, or when it holds a plain comma list. Each
//! pass replaces every template by its concrete names, copying the
//! template's subtree under each of them, and the passes repeat until the
//! table holds no template.

use crate::range::parse_axis;
use crate::record::SectionRecord;
use crate::tree::SectionTree;
use crate::{Error, Result};

const RANGE_MARKERS: [&str; 5] = ["(", "[", ":", "range(", "irange("];

/// Upper bound on expansion passes; templates nest only a few levels deep.
const MAX_PASSES: usize = 64;

/// Root name of the scratch trees built between passes.
const PASS_ROOT: &str = "__expand__";

fn is_range_component(component: &str) -> bool {
    RANGE_MARKERS
        .iter()
        .any(|marker| component.starts_with(marker))
}

/// Concrete names for a template heading, `None` for an ordinary one.
///
/// Multi-axis names produce the cartesian product of their axes in axis
/// order. Components without a range marker are kept verbatim, split on
/// commas.
///
/// # Example
/// ```
/// use cfgtree_sections::expand::template_names;
///
/// let names = template_names("(1,2)_(x,y)").unwrap().unwrap();
/// assert_eq!(names, vec!["1_x", "1_y", "2_x", "2_y"]);
/// assert_eq!(template_names("train").unwrap(), None);
/// ```
pub fn template_names(name: &str) -> Result<Option<Vec<String>>> {
    let names = if name.split('_').any(is_range_component) {
        let mut axes = Vec::new();
        for component in name.split('_') {
            let tokens = if is_range_component(component) {
                parse_axis(component)?
                    .iter()
                    .map(|value| value.to_section_token())
                    .collect()
            } else {
                component.split(',').map(str::to_string).collect::<Vec<_>>()
            };
            axes.push(tokens);
        }
        cartesian(&axes)
    } else if name.contains(',') {
        name.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        return Ok(None);
    };

    if names.is_empty() {
        return Err(Error::template(name, "expands to no sections"));
    }
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(Error::template(name, "expands to an empty section name"));
    }
    Ok(Some(names))
}

fn cartesian(axes: &[Vec<String>]) -> Vec<String> {
    let mut names = vec![String::new()];
    for (axis_id, axis) in axes.iter().enumerate() {
        let mut next = Vec::with_capacity(names.len() * axis.len());
        for prefix in &names {
            for token in axis {
                if axis_id == 0 {
                    next.push(token.clone());
                } else {
                    next.push(format!("{prefix}_{token}"));
                }
            }
        }
        names = next;
    }
    names
}

/// Expand every template heading until none is left.
///
/// All concrete sections produced from one template occurrence share a
/// fresh template id and follow each other in the table, each followed by
/// its own copy of the template's descendants.
pub fn expand_templates(mut sections: Vec<SectionRecord>) -> Result<Vec<SectionRecord>> {
    let mut next_template_id = 1_u32;

    for pass in 0..MAX_PASSES {
        let tree = SectionTree::build(&sections, PASS_ROOT)?;
        let mut added = vec![false; sections.len()];
        let mut expanded = Vec::with_capacity(sections.len());
        let mut found_template = false;

        for (seq, record) in sections.iter().enumerate() {
            if added[seq] {
                continue;
            }
            added[seq] = true;

            let Some(names) = template_names(&record.name)? else {
                expanded.push(record.clone());
                continue;
            };
            found_template = true;

            let template_id = next_template_id;
            next_template_id += 1;

            let descendants: Vec<usize> = tree
                .descendants(tree.node_for_seq(seq))
                .into_iter()
                .filter_map(|id| tree.node(id).seq_id)
                .collect();

            for name in names {
                expanded.push(record.renamed(name, template_id));
                for &child_seq in &descendants {
                    expanded.push(SectionRecord {
                        template_id: 0,
                        ..sections[child_seq].clone()
                    });
                }
            }
            for child_seq in descendants {
                added[child_seq] = true;
            }
        }

        if !found_template {
            tracing::debug!(passes = pass, sections = sections.len(), "template expansion done");
            return Ok(sections);
        }
        tracing::debug!(pass, sections = expanded.len(), "expanded template sections");
        sections = expanded;
    }

    let pending = sections
        .iter()
        .find(|record| matches!(template_names(&record.name), Ok(Some(_))))
        .map(|record| record.name.clone())
        .unwrap_or_default();
    Err(Error::template(
        &pending,
        format!("still expanding after {MAX_PASSES} passes"),
    ))
}
