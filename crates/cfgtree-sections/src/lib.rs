//! Section indexing for cfgtree configuration files.
//!
//! A cfg file is a line-oriented list of `key=value` arguments grouped under
//! nested headings:
//!
//! ```text
//! ## train
//! lr=0.1
//! ### (1,2)_(x,y)
//! seed=%N0%
//! ```
//!
//! A heading is a line starting with `##`; one extra `#` per nesting level.
//! This crate turns such a file into a [`SectionIndex`]:
//!
//! - [`scan`] reads the file, inlines `%import%` directives and collects the
//!   flat list of [`SectionRecord`]s.
//! - [`expand`] rewrites template headings (ranges, lists, comma groups) into
//!   concrete sections, copying their subtrees, until no template is left.
//! - [`tree`] rebuilds the heading hierarchy as an arena of nodes.
//! - [`cache`] persists the index next to the file and reuses it while it is
//!   not older than any of its inputs.

pub mod cache;
pub mod error;
pub mod expand;
pub mod index;
pub mod range;
pub mod record;
pub mod scan;
pub mod tree;

pub use cache::{CACHE_FORMAT_VERSION, load_cached, read_or_load, store};
pub use error::{Error, Result};
pub use expand::{expand_templates, template_names};
pub use index::SectionIndex;
pub use range::{
    Scalar, float_text, list_items, parse_axis, parse_range, split_top_level, strip_quotes,
};
pub use record::{
    COMMON_SECTION, EXCLUSIVE_SECTION, SUBSTITUTION_PREFIX, SectionRecord, is_common_name,
};
pub use tree::{Node, NodeId, ROOT, SectionTree};
