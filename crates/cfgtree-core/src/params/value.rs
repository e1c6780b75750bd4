//! Member kinds and values

pub use cfgtree_sections::float_text;

use super::ParamSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Float,
    Bool,
    Str,
    Seq,
    Map,
    /// `_`-joined path fragments.
    MultiPath,
    /// `::`-joined cfg specifications.
    MultiCfg,
    Nested,
}

impl ParamKind {
    /// Separator used by `name+=value`, `None` for kinds that cannot
    /// accumulate.
    pub fn accumulator(self) -> Option<&'static str> {
        match self {
            ParamKind::Seq => Some(","),
            ParamKind::MultiPath => Some("_"),
            ParamKind::MultiCfg => Some("::"),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::Str => "str",
            ParamKind::Seq => "seq",
            ParamKind::Map => "map",
            ParamKind::MultiPath => "multi_path",
            ParamKind::MultiCfg => "multi_cfg",
            ParamKind::Nested => "nested",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name {
            "int" => ParamKind::Int,
            "float" => ParamKind::Float,
            "bool" => ParamKind::Bool,
            "str" => ParamKind::Str,
            "seq" => ParamKind::Seq,
            "map" => ParamKind::Map,
            "multi_path" => ParamKind::MultiPath,
            "multi_cfg" => ParamKind::MultiCfg,
            "nested" => ParamKind::Nested,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a member.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Seq(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
    MultiPath(String),
    MultiCfg(String),
    Nested(ParamSet),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::Seq(_) => ParamKind::Seq,
            ParamValue::Map(_) => ParamKind::Map,
            ParamValue::MultiPath(_) => ParamKind::MultiPath,
            ParamValue::MultiCfg(_) => ParamKind::MultiCfg,
            ParamValue::Nested(_) => ParamKind::Nested,
        }
    }

    /// The empty form of a kind, for kinds that have one.
    pub fn empty(kind: ParamKind) -> Option<Self> {
        match kind {
            ParamKind::Str => Some(ParamValue::Str(String::new())),
            ParamKind::Seq => Some(ParamValue::Seq(Vec::new())),
            ParamKind::Map => Some(ParamValue::Map(BTreeMap::new())),
            ParamKind::MultiPath => Some(ParamValue::MultiPath(String::new())),
            ParamKind::MultiCfg => Some(ParamValue::MultiCfg(String::new())),
            _ => None,
        }
    }

    /// Text that reads back to the same value as an argument value.
    ///
    /// Sequences become `(a,'b',)`, mappings JSON, empty strings `__n__`.
    pub fn to_arg_text(&self) -> String {
        match self {
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(x) => float_text(*x),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Str(s) | ParamValue::MultiPath(s) | ParamValue::MultiCfg(s) => {
                if s.is_empty() {
                    "__n__".to_string()
                } else {
                    s.clone()
                }
            }
            ParamValue::Seq(items) => {
                let mut text = String::from("(");
                for item in items {
                    match item {
                        ParamValue::Str(s) => text.push_str(&format!("'{s}'")),
                        other => text.push_str(&other.to_arg_text()),
                    }
                    text.push(',');
                }
                text.push(')');
                text
            }
            ParamValue::Map(_) => self.to_json().to_string(),
            ParamValue::Nested(_) => String::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Int(n) => Value::from(*n),
            ParamValue::Float(x) => Number::from_f64(*x).map_or(Value::Null, Value::Number),
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Str(s) | ParamValue::MultiPath(s) | ParamValue::MultiCfg(s) => {
                Value::String(s.clone())
            }
            ParamValue::Seq(items) => Value::Array(items.iter().map(ParamValue::to_json).collect()),
            ParamValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            ParamValue::Nested(set) => set.to_json(),
        }
    }

    /// Value for a JSON document, objects read as mappings.
    ///
    /// `null` has no value; `null` entries of arrays and objects are dropped.
    pub fn from_json(value: &Value) -> Option<Self> {
        let converted = match value {
            Value::Null => return None,
            Value::Bool(b) => ParamValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                None => ParamValue::Float(n.as_f64()?),
            },
            Value::String(s) => ParamValue::Str(s.clone()),
            Value::Array(items) => {
                ParamValue::Seq(items.iter().filter_map(ParamValue::from_json).collect())
            }
            Value::Object(entries) => ParamValue::Map(
                entries
                    .iter()
                    .filter_map(|(k, v)| Some((k.clone(), ParamValue::from_json(v)?)))
                    .collect(),
            ),
        };
        Some(converted)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg_text())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sequence_text_quotes_strings() {
        let value = ParamValue::Seq(vec![
            ParamValue::Int(1),
            ParamValue::Str("a".into()),
            ParamValue::Seq(vec![ParamValue::Float(0.5)]),
        ]);
        assert_eq!(value.to_arg_text(), "(1,'a',(0.5,),)");
    }

    #[test]
    fn empty_string_text_is_reset_marker() {
        assert_eq!(ParamValue::Str(String::new()).to_arg_text(), "__n__");
    }

    #[test]
    fn float_text_keeps_decimal_point() {
        assert_eq!(float_text(1.0), "1.0");
        assert_eq!(float_text(0.05), "0.05");
    }

    #[test]
    fn json_numbers_keep_integer_kind() {
        assert_eq!(ParamValue::from_json(&json!(3)), Some(ParamValue::Int(3)));
        assert_eq!(ParamValue::from_json(&json!(3.5)), Some(ParamValue::Float(3.5)));
        assert_eq!(ParamValue::from_json(&json!(null)), None);
    }

    #[test]
    fn only_sequences_and_multi_values_accumulate() {
        assert_eq!(ParamKind::Seq.accumulator(), Some(","));
        assert_eq!(ParamKind::MultiPath.accumulator(), Some("_"));
        assert_eq!(ParamKind::MultiCfg.accumulator(), Some("::"));
        assert_eq!(ParamKind::Int.accumulator(), None);
        assert_eq!(ParamKind::Map.accumulator(), None);
    }
}
