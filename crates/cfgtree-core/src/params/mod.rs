//! Parameter object tree
//!
//! The resolver binds arguments into anything implementing [`ParamTree`].
//! [`ParamSet`] is the built-in implementation, convertible from and to
//! JSON documents.

mod coerce;
mod set;
mod value;

pub use coerce::{
    RESET_MARKERS, coerce, is_reset_marker, join_multi, multi_cfg_groups, parse_sequence,
};
pub use set::{KIND_KEY, Param, ParamSet};
pub use value::{ParamKind, ParamValue, float_text};

use crate::Result;

/// A leaf member as seen through [`ParamTree::leaves`].
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Dotted name.
    pub name: String,
    pub kind: ParamKind,
    pub value: Option<ParamValue>,
    pub help: Option<String>,
}

/// Access to a tree of named, typed parameters.
pub trait ParamTree {
    /// Leaf members with dotted names, in name order.
    fn leaves(&self) -> Vec<Leaf>;

    /// Declared kind of a member or group.
    fn kind_of(&self, name: &str) -> Option<ParamKind>;

    /// Current value of a member.
    fn value_of(&self, name: &str) -> Option<ParamValue>;

    /// Replace the value of an existing member.
    fn assign(&mut self, name: &str, value: ParamValue) -> Result<()>;
}
