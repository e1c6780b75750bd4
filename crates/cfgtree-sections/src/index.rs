//! Complete section index of one cfg file

use crate::expand::expand_templates;
use crate::record::SectionRecord;
use crate::scan::{Scanned, read_source, scan_sections};
use crate::tree::SectionTree;
use crate::Result;
use cfgtree_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Everything the resolver needs to know about a cfg file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionIndex {
    pub path: NormalizedPath,
    /// Name of the synthetic root heading.
    pub root_name: String,
    /// Expanded section table in document order.
    pub sections: Vec<SectionRecord>,
    pub tree: SectionTree,
    /// File lines, imports inlined, trimmed.
    pub lines: Vec<String>,
    /// Lines inserted before the file's first line.
    pub line_offset: usize,
    pub imports: Vec<NormalizedPath>,
}

impl SectionIndex {
    /// Read, scan and expand a cfg file.
    pub fn build(path: &NormalizedPath) -> Result<Self> {
        let source = read_source(path)?;
        Self::from_lines(path, source.lines, source.imports)
    }

    /// Index already-read lines as if they were the content of `path`.
    pub fn from_lines(
        path: &NormalizedPath,
        mut lines: Vec<String>,
        imports: Vec<NormalizedPath>,
    ) -> Result<Self> {
        let Scanned {
            sections,
            line_offset,
        } = scan_sections(&mut lines);
        let sections = expand_templates(sections)?;
        let root_name = Self::root_name_for(path);
        let tree = SectionTree::build(&sections, &root_name)?;

        tracing::debug!(
            path = %path,
            sections = sections.len(),
            lines = lines.len(),
            "indexed cfg file"
        );

        Ok(Self {
            path: path.clone(),
            root_name,
            sections,
            tree,
            lines,
            line_offset,
            imports,
        })
    }

    /// `__root_<file stem>__`
    pub fn root_name_for(path: &NormalizedPath) -> String {
        format!("__root_{}__", path.file_stem().unwrap_or("cfg"))
    }

    /// Rename the section at `seq` in both the table and the tree.
    pub fn rename_section(&mut self, seq: usize, name: &str) {
        self.sections[seq].name = name.to_string();
        self.tree.rename(self.tree.node_for_seq(seq), name);
    }

    /// 1-based line number in the original file of the line at `line_id`.
    pub fn line_number(&self, line_id: usize) -> usize {
        (line_id + 1).saturating_sub(self.line_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(text: &str) -> SectionIndex {
        let lines = text.lines().map(|l| l.trim().to_string()).collect();
        SectionIndex::from_lines(&NormalizedPath::new("cfg/demo.cfg"), lines, Vec::new()).unwrap()
    }

    #[test]
    fn root_name_follows_file_stem() {
        assert_eq!(index("## a\nx=1").root_name, "__root_demo__");
    }

    #[test]
    fn line_numbers_account_for_inserted_heading() {
        let idx = index("x=1\n## a\ny=2");
        assert_eq!(idx.line_offset, 1);
        assert_eq!(idx.line_number(1), 1);
        assert_eq!(idx.line_number(3), 3);
    }

    #[test]
    fn rename_updates_table_and_tree() {
        let mut idx = index("## a\nx=1");
        idx.rename_section(0, "b");
        assert_eq!(idx.sections[0].name, "b");
        assert_eq!(idx.tree.node(1).name, "b");
    }
}
