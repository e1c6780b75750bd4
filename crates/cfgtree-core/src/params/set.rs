//! Ordered parameter sets

use super::{Leaf, ParamKind, ParamTree, ParamValue};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key of a member declaration object in a JSON document.
pub const KIND_KEY: &str = "__kind__";

/// One member of a [`ParamSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub kind: ParamKind,
    pub value: Option<ParamValue>,
    pub help: Option<String>,
}

impl Param {
    pub fn new(value: ParamValue) -> Self {
        Self {
            kind: value.kind(),
            value: Some(value),
            help: None,
        }
    }

    /// A member with a declared kind and no value yet.
    pub fn declared(kind: ParamKind) -> Self {
        Self {
            kind,
            value: None,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A nested set of named parameters, kept sorted by name.
///
/// Nested sets are addressed with dotted names (`model.lr`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    members: BTreeMap<String, Param>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ParamSet::insert`].
    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.insert(name, Param::new(value));
        self
    }

    /// Builder form of [`ParamSet::insert`] for an arbitrary member.
    pub fn with_param(mut self, name: &str, param: Param) -> Self {
        self.insert(name, param);
        self
    }

    /// Insert a member at a dotted name, creating intermediate groups.
    pub fn insert(&mut self, name: &str, param: Param) {
        match name.split_once('.') {
            None => {
                self.members.insert(name.to_string(), param);
            }
            Some((head, rest)) => {
                let group = self
                    .members
                    .entry(head.to_string())
                    .or_insert_with(|| Param::new(ParamValue::Nested(ParamSet::new())));
                if !matches!(group.value, Some(ParamValue::Nested(_))) {
                    *group = Param::new(ParamValue::Nested(ParamSet::new()));
                }
                if let Some(ParamValue::Nested(set)) = &mut group.value {
                    set.insert(rest, param);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        match name.split_once('.') {
            None => self.members.get(name),
            Some((head, rest)) => match &self.members.get(head)?.value {
                Some(ParamValue::Nested(set)) => set.get(rest),
                _ => None,
            },
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Param> {
        match name.split_once('.') {
            None => self.members.get_mut(name),
            Some((head, rest)) => match &mut self.members.get_mut(head)?.value {
                Some(ParamValue::Nested(set)) => set.get_mut(rest),
                _ => None,
            },
        }
    }

    /// Direct members in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Param)> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn collect_leaves(&self, prefix: &str, out: &mut Vec<Leaf>) {
        for (name, param) in &self.members {
            let full_name = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match &param.value {
                Some(ParamValue::Nested(set)) => set.collect_leaves(&full_name, out),
                value => out.push(Leaf {
                    name: full_name,
                    kind: param.kind,
                    value: value.clone(),
                    help: param.help.clone(),
                }),
            }
        }
    }

    /// Build a set from a JSON object.
    ///
    /// Objects become nested sets, `null` members are skipped, and an object
    /// carrying a `__kind__` key declares a member explicitly:
    ///
    /// ```json
    /// {"paths": {"__kind__": "multi_path", "value": "a_b", "help": "input paths"}}
    /// ```
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(Error::invalid_value(
                "<root>",
                &value.to_string(),
                "expected a JSON object",
            ));
        };

        let mut set = ParamSet::new();
        for (name, entry) in entries {
            match entry {
                Value::Null => {
                    tracing::debug!(name = %name, "skipping member without value or kind");
                }
                Value::Object(fields) if fields.contains_key(KIND_KEY) => {
                    set.members.insert(name.clone(), declaration(name, fields)?);
                }
                Value::Object(_) => {
                    let nested = ParamSet::from_json(entry)?;
                    set.members
                        .insert(name.clone(), Param::new(ParamValue::Nested(nested)));
                }
                other => {
                    if let Some(value) = ParamValue::from_json(other) {
                        set.members.insert(name.clone(), Param::new(value));
                    }
                }
            }
        }
        Ok(set)
    }

    /// JSON object of all members; declared members without value are `null`.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.members
                .iter()
                .map(|(name, param)| {
                    let value = param.value.as_ref().map_or(Value::Null, ParamValue::to_json);
                    (name.clone(), value)
                })
                .collect::<Map<_, _>>(),
        )
    }
}

fn declaration(name: &str, fields: &Map<String, Value>) -> Result<Param> {
    let kind_name = fields.get(KIND_KEY).and_then(Value::as_str).unwrap_or("");
    let kind = ParamKind::parse(kind_name)
        .ok_or_else(|| Error::invalid_value(name, kind_name, "unknown member kind"))?;

    let value = match fields.get("value") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(typed_json(name, kind, raw)?),
    };
    let help = fields.get("help").and_then(Value::as_str).map(str::to_string);

    Ok(Param { kind, value, help })
}

fn typed_json(name: &str, kind: ParamKind, raw: &Value) -> Result<ParamValue> {
    let mismatch = || Error::invalid_value(name, &raw.to_string(), format!("expected {kind}"));
    let value = match kind {
        ParamKind::Nested => ParamValue::Nested(ParamSet::from_json(raw)?),
        _ => ParamValue::from_json(raw).ok_or_else(mismatch)?,
    };
    let converted = match (kind, value) {
        (ParamKind::MultiPath, ParamValue::Str(s)) => ParamValue::MultiPath(s),
        (ParamKind::MultiCfg, ParamValue::Str(s)) => ParamValue::MultiCfg(s),
        (ParamKind::Float, ParamValue::Int(n)) => ParamValue::Float(n as f64),
        (_, value) if value.kind() == kind => value,
        _ => return Err(mismatch()),
    };
    Ok(converted)
}

impl ParamTree for ParamSet {
    fn leaves(&self) -> Vec<Leaf> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn kind_of(&self, name: &str) -> Option<ParamKind> {
        self.get(name).map(|param| param.kind)
    }

    fn value_of(&self, name: &str) -> Option<ParamValue> {
        self.get(name).and_then(|param| param.value.clone())
    }

    fn assign(&mut self, name: &str, value: ParamValue) -> Result<()> {
        let param = self.get_mut(name).ok_or_else(|| Error::UnknownParam {
            name: name.to_string(),
            arg: name.to_string(),
        })?;
        if param.kind == ParamKind::Nested {
            return Err(Error::invalid_argument(
                name,
                "cannot assign a value to a parameter group",
            ));
        }
        param.value = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn dotted_insert_creates_groups() {
        let mut set = ParamSet::new();
        set.insert("model.lr", Param::new(ParamValue::Float(0.1)));
        set.insert("model.depth", Param::new(ParamValue::Int(3)));

        assert_eq!(set.kind_of("model"), Some(ParamKind::Nested));
        assert_eq!(set.value_of("model.lr"), Some(ParamValue::Float(0.1)));
        let names: Vec<_> = set.leaves().into_iter().map(|leaf| leaf.name).collect();
        assert_eq!(names, vec!["model.depth", "model.lr"]);
    }

    #[test]
    fn json_round_trip_of_plain_values() {
        let doc = json!({"a": 1, "b": {"c": "x", "d": [1, 2]}, "e": null});
        let set = ParamSet::from_json(&doc).unwrap();
        assert!(set.get("e").is_none());
        assert_eq!(set.to_json(), json!({"a": 1, "b": {"c": "x", "d": [1, 2]}}));
    }

    #[test]
    fn declarations_set_kind_and_help() {
        let doc = json!({
            "paths": {"__kind__": "multi_path", "value": "a_b", "help": "inputs"},
            "ratio": {"__kind__": "float", "value": 1},
            "opts": {"__kind__": "map"}
        });
        let set = ParamSet::from_json(&doc).unwrap();

        let paths = set.get("paths").unwrap();
        assert_eq!(paths.value, Some(ParamValue::MultiPath("a_b".into())));
        assert_eq!(paths.help.as_deref(), Some("inputs"));
        assert_eq!(set.value_of("ratio"), Some(ParamValue::Float(1.0)));
        assert_eq!(set.kind_of("opts"), Some(ParamKind::Map));
        assert_eq!(set.value_of("opts"), None);
    }

    #[test]
    fn declaration_kind_mismatch_is_an_error() {
        let doc = json!({"n": {"__kind__": "int", "value": "abc"}});
        assert!(matches!(
            ParamSet::from_json(&doc),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn assigning_unknown_or_group_fails() {
        let mut set = ParamSet::new()
            .with("model", ParamValue::Nested(ParamSet::new().with("lr", ParamValue::Float(0.1))));
        assert!(matches!(
            set.assign("missing", ParamValue::Int(1)),
            Err(Error::UnknownParam { .. })
        ));
        assert!(matches!(
            set.assign("model", ParamValue::Int(1)),
            Err(Error::InvalidArgument { .. })
        ));
        set.assign("model.lr", ParamValue::Float(0.2)).unwrap();
        assert_eq!(set.value_of("model.lr"), Some(ParamValue::Float(0.2)));
    }
}
