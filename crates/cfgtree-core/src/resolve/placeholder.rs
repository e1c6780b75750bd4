//! Placeholder substitution in section lines
//!
//! Every placeholder has a short `%X%` and a long `__x__` form. The direct
//! ones (name, parent, root, full names, name segments) are always
//! replaced. The derived ones need a numeric-like name or a deep enough
//! ancestry and are only evaluated when they occur in the line.

use crate::params::float_text;
use crate::{Error, Result};
use cfgtree_sections::{NodeId, SectionTree};

#[derive(Debug, Clone, Copy)]
enum Derived {
    /// Name of the ancestor at this depth.
    Ancestor(usize),
    /// Own name and ancestor names up to this depth, `_`-joined.
    JoinedNames(usize),
    Ratio(usize),
    List(usize),
    ListRatio(usize),
    Range(usize),
}

const DERIVED: [(&str, &str, Derived); 20] = [
    ("%GP%", "__g_parent__", Derived::Ancestor(2)),
    ("%GGP%", "__gg_parent__", Derived::Ancestor(3)),
    ("%GF%", "__g_full__", Derived::JoinedNames(2)),
    ("%GGF%", "__gg_full__", Derived::JoinedNames(3)),
    ("%RI%", "__ratio__", Derived::Ratio(0)),
    ("%PRI%", "__parent_ratio__", Derived::Ratio(1)),
    ("%GPRI%", "__g_parent_ratio__", Derived::Ratio(2)),
    ("%GGPRI%", "__gg_parent_ratio__", Derived::Ratio(3)),
    ("%L%", "__list__", Derived::List(0)),
    ("%PL%", "__parent_list__", Derived::List(1)),
    ("%GPL%", "__g_parent_list__", Derived::List(2)),
    ("%GGPL%", "__gg_parent_list__", Derived::List(3)),
    ("%LRI%", "__list_ratio__", Derived::ListRatio(0)),
    ("%PLRI%", "__parent_list_ratio__", Derived::ListRatio(1)),
    ("%GPLRI%", "__g_parent_list_ratio__", Derived::ListRatio(2)),
    ("%GGPLRI%", "__gg_parent_list_ratio__", Derived::ListRatio(3)),
    ("%RA%", "__range__", Derived::Range(0)),
    ("%PRA%", "__parent_range__", Derived::Range(1)),
    ("%GPRA%", "__g_parent_range__", Derived::Range(2)),
    ("%GGPRA%", "__gg_parent_range__", Derived::Range(3)),
];

struct Identity<'a> {
    tree: &'a SectionTree,
    node: NodeId,
}

impl<'a> Identity<'a> {
    fn name_at(&self, depth: usize) -> std::result::Result<&'a str, String> {
        self.tree
            .ancestor(self.node, depth)
            .map(|id| self.tree.node(id).name.as_str())
            .ok_or_else(|| format!("section has no ancestor {depth} levels up"))
    }

    fn direct(&self) -> Vec<([String; 2], String)> {
        let node = self.tree.node(self.node);
        let parent = self.tree.node(node.parent.unwrap_or(self.node));
        let root = self
            .tree
            .ancestors(self.node)
            .last()
            .map_or(node.name.as_str(), |&id| self.tree.node(id).name.as_str());

        let pair = |short: &str, long: &str| [short.to_string(), long.to_string()];
        let mut subs = vec![
            (pair("%N%", "__name__"), node.name.clone()),
            (pair("%P%", "__parent__"), parent.name.clone()),
            (pair("%R%", "__root__"), root.to_string()),
            (pair("%F%", "__full__"), node.full_name.clone()),
            (pair("%PF%", "__parent_full__"), parent.full_name.clone()),
        ];

        let segments: Vec<&str> = node.name.split('_').collect();
        if segments.len() > 1 {
            for (i, segment) in segments.iter().enumerate() {
                subs.push((
                    [format!("%N{i}%"), format!("__name{i}__")],
                    segment.to_string(),
                ));
                if i > 0 {
                    subs.push((
                        [format!("%N{i}*%"), format!("__name{i}*__")],
                        segments[i..].join("_"),
                    ));
                }
            }
        }
        subs
    }

    fn derived(&self, kind: Derived) -> std::result::Result<String, String> {
        match kind {
            Derived::Ancestor(depth) => self.name_at(depth).map(str::to_string),
            Derived::JoinedNames(depth) => (0..=depth)
                .map(|d| self.name_at(d))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(|names| names.join("_")),
            Derived::Ratio(depth) => ratio(self.name_at(depth)?),
            Derived::List(depth) => Ok(self.name_at(depth)?.replace('_', ",")),
            Derived::ListRatio(depth) => list_ratio(self.name_at(depth)?),
            Derived::Range(depth) => Ok(self.name_at(depth)?.replace('_', ":")),
        }
    }
}

fn ratio(name: &str) -> std::result::Result<String, String> {
    name.parse::<f64>()
        .map(|value| float_text(value / 100.0))
        .map_err(|_| format!("'{name}' is not a number"))
}

/// Each `_` segment as a fraction of 100; a leading `n` negates.
fn list_ratio(name: &str) -> std::result::Result<String, String> {
    name.split('_')
        .map(|segment| match segment.strip_prefix('n') {
            Some(rest) => ratio(&format!("-{rest}")),
            None => ratio(segment),
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(|parts| parts.join(","))
}

/// Substitute placeholders in the lines of the section at `node`.
pub fn substitute(tree: &SectionTree, node: NodeId, lines: &[String]) -> Result<Vec<String>> {
    let identity = Identity { tree, node };
    let direct = identity.direct();

    lines
        .iter()
        .map(|line| {
            let mut line = line.clone();
            for (tokens, value) in &direct {
                for token in tokens {
                    if line.contains(token.as_str()) {
                        line = line.replace(token.as_str(), value);
                    }
                }
            }
            for (short, long, kind) in DERIVED {
                for token in [short, long] {
                    if !line.contains(token) {
                        continue;
                    }
                    let value = identity.derived(kind).map_err(|message| Error::Placeholder {
                        token: token.to_string(),
                        section: tree.node(node).name.clone(),
                        message,
                    })?;
                    line = line.replace(token, &value);
                }
            }
            Ok(line)
        })
        .collect()
}
