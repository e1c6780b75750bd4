//! Heading hierarchy rebuilt from the flat section table
//!
//! Nodes live in an arena and refer to each other by index. The synthetic
//! root is always node [`ROOT`]; the node of section `seq` is `seq + 1`.

use crate::record::{SectionRecord, is_common_name};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a node in a [`SectionTree`].
pub type NodeId = usize;

/// The synthetic root node.
pub const ROOT: NodeId = 0;

/// One heading in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// Parent name concatenated with own name.
    pub full_name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Position in the flat section table, `None` for the root.
    pub seq_id: Option<usize>,
    pub start_line: usize,
    pub end_line: usize,
    pub level: usize,
    pub template_id: u32,
    pub is_common: bool,
}

/// Arena of heading nodes with a one-to-many full-name index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTree {
    nodes: Vec<Node>,
    by_full_name: BTreeMap<String, Vec<NodeId>>,
}

impl SectionTree {
    /// Build the tree for a flat, document-ordered section list.
    ///
    /// A record becomes a child of the closest preceding record with a
    /// lower level.
    pub fn build(sections: &[SectionRecord], root_name: &str) -> Result<Self> {
        let root = Node {
            name: root_name.to_string(),
            full_name: root_name.to_string(),
            parent: None,
            children: Vec::new(),
            seq_id: None,
            start_line: 0,
            end_line: 0,
            level: 0,
            template_id: 0,
            is_common: false,
        };
        let mut tree = Self {
            nodes: Vec::with_capacity(sections.len() + 1),
            by_full_name: BTreeMap::new(),
        };
        tree.nodes.push(root);

        tree.attach(sections, ROOT, 0, 0)?;
        Ok(tree)
    }

    /// Attach every record deeper than `scope_level`, starting at `cursor`,
    /// under `parent`. Returns the first record that belongs to an outer
    /// scope.
    fn attach(
        &mut self,
        sections: &[SectionRecord],
        parent: NodeId,
        scope_level: usize,
        mut cursor: usize,
    ) -> Result<usize> {
        while let Some(record) = sections.get(cursor) {
            if record.name.is_empty() {
                return Err(Error::EmptySectionName { seq: cursor });
            }
            if record.level <= scope_level && parent != ROOT {
                break;
            }

            let id = self.nodes.len();
            let full_name = format!("{}{}", self.nodes[parent].name, record.name);
            self.nodes.push(Node {
                name: record.name.clone(),
                full_name: full_name.clone(),
                parent: Some(parent),
                children: Vec::new(),
                seq_id: Some(cursor),
                start_line: record.start_line,
                end_line: record.end_line,
                level: record.level,
                template_id: record.template_id,
                is_common: is_common_name(&record.name),
            });
            self.nodes[parent].children.push(id);
            self.by_full_name.entry(full_name).or_default().push(id);

            cursor = self.attach(sections, id, record.level, cursor + 1)?;
        }
        Ok(cursor)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Node of the section at `seq` in the flat table.
    pub fn node_for_seq(&self, seq: usize) -> NodeId {
        seq + 1
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    /// Number of sections, the root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All section nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().skip(1)
    }

    /// Nodes whose full name is `full_name`, in document order.
    pub fn find_full_name(&self, full_name: &str) -> &[NodeId] {
        self.by_full_name
            .get(full_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Ancestors of `id` below the root, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            if parent == ROOT {
                break;
            }
            out.push(parent);
            current = self.nodes[parent].parent;
        }
        out
    }

    /// The `depth`-th ancestor of `id`, counting the root.
    pub fn ancestor(&self, id: NodeId, depth: usize) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..depth {
            current = self.nodes[current].parent?;
        }
        Some(current)
    }

    /// Rename a node in place; its full name and the index are left alone.
    pub fn rename(&mut self, id: NodeId, name: &str) {
        let node = &mut self.nodes[id];
        node.name = name.to_string();
        node.is_common = is_common_name(name);
    }
}
