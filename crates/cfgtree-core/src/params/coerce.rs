//! Text to value conversion for argument values

use super::{ParamKind, ParamValue};
use crate::{Error, Result};
use cfgtree_sections::{Scalar, list_items, parse_axis, parse_range, split_top_level, strip_quotes};
use std::collections::BTreeMap;

/// Values that reset a member to the empty form of its kind.
pub const RESET_MARKERS: [&str; 2] = ["#", "__n__"];

pub fn is_reset_marker(raw: &str) -> bool {
    RESET_MARKERS.contains(&raw.trim())
}

/// Convert an argument value to a value of `kind`.
///
/// `name` is only used for error messages.
pub fn coerce(name: &str, kind: ParamKind, raw: &str) -> Result<ParamValue> {
    let raw = raw.trim();
    if is_reset_marker(raw) {
        if let Some(empty) = ParamValue::empty(kind) {
            return Ok(empty);
        }
    }

    let invalid = |message: &str| Error::invalid_value(name, raw, message);

    match kind {
        ParamKind::Int => match Scalar::parse(raw) {
            Scalar::Int(n) => Ok(ParamValue::Int(n)),
            Scalar::Float(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                Ok(ParamValue::Int(x as i64))
            }
            _ => Err(invalid("expected an integer")),
        },
        ParamKind::Float => match Scalar::parse(raw) {
            Scalar::Int(n) => Ok(ParamValue::Float(n as f64)),
            Scalar::Float(x) => Ok(ParamValue::Float(x)),
            Scalar::Str(_) => Err(invalid("expected a number")),
        },
        ParamKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(ParamValue::Bool(true)),
            "false" => Ok(ParamValue::Bool(false)),
            _ => match Scalar::parse(raw) {
                Scalar::Int(n) => Ok(ParamValue::Bool(n != 0)),
                Scalar::Float(x) => Ok(ParamValue::Bool(x != 0.0)),
                Scalar::Str(_) => Err(invalid("expected true, false or an integer")),
            },
        },
        ParamKind::Str => Ok(ParamValue::Str(strip_quotes(raw).to_string())),
        ParamKind::Seq => parse_sequence(raw)
            .map(ParamValue::Seq)
            .map_err(|e| invalid(&e)),
        ParamKind::Map => parse_mapping(raw).map_err(|e| invalid(&e)),
        ParamKind::MultiPath => Ok(ParamValue::MultiPath(join_multi(raw, "_"))),
        ParamKind::MultiCfg => Ok(ParamValue::MultiCfg(join_multi(raw, "::"))),
        ParamKind::Nested => Err(invalid("is a parameter group, not a parameter")),
    }
}

fn from_scalar(scalar: Scalar) -> ParamValue {
    match scalar {
        Scalar::Int(n) => ParamValue::Int(n),
        Scalar::Float(x) => ParamValue::Float(x),
        Scalar::Str(s) => ParamValue::Str(s),
    }
}

fn scalar_value(token: &str) -> ParamValue {
    from_scalar(Scalar::parse(token))
}

fn is_range_spec(spec: &str) -> bool {
    let spec = spec.trim();
    spec.starts_with("range(") || spec.starts_with("irange(") || spec.contains(':')
}

fn bracketed(spec: &str) -> Option<&str> {
    let close = match spec.chars().next()? {
        '(' => ')',
        '[' => ']',
        _ => return None,
    };
    (spec.len() >= 2 && spec.ends_with(close)).then(|| &spec[1..spec.len() - 1])
}

/// Parse a sequence value.
///
/// Accepts the range grammar, `+`-joined ranges, bracketed literal lists
/// (nested brackets give nested sequences) and plain comma lists. Colon
/// text that is not a numeric range is taken as a plain list.
pub fn parse_sequence(raw: &str) -> std::result::Result<Vec<ParamValue>, String> {
    let raw = raw.trim();

    if raw.contains('+') && raw.split('+').all(is_range_spec) {
        let values = parse_axis(raw).map_err(|e| e.to_string())?;
        return Ok(values.into_iter().map(from_scalar).collect());
    }
    if is_range_spec(raw) {
        match parse_range(raw) {
            Ok(values) => return Ok(values.into_iter().map(from_scalar).collect()),
            Err(e) if raw.starts_with("range(") || raw.starts_with("irange(") => {
                return Err(e.to_string());
            }
            Err(_) => {}
        }
    }
    if let Some(inner) = bracketed(raw) {
        return Ok(literal_items(inner));
    }
    Ok(list_items(raw).into_iter().map(scalar_value).collect())
}

fn literal_items(inner: &str) -> Vec<ParamValue> {
    let mut items = split_top_level(inner, ',');
    if items.last().is_some_and(|item| item.trim().is_empty()) {
        items.pop();
    }
    items
        .into_iter()
        .map(str::trim)
        .map(|item| match bracketed(item) {
            Some(nested) => ParamValue::Seq(literal_items(nested)),
            None => scalar_value(item),
        })
        .collect()
}

fn parse_mapping(raw: &str) -> std::result::Result<ParamValue, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value @ serde_json::Value::Object(_)) => {
            Ok(ParamValue::from_json(&value).unwrap_or(ParamValue::Map(BTreeMap::new())))
        }
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Strip quotes around each `sep`-separated token and drop `sep!` markers.
pub fn join_multi(raw: &str, sep: &str) -> String {
    raw.split(sep)
        .map(strip_quotes)
        .collect::<Vec<_>>()
        .join(sep)
        .replace(&format!("{sep}!"), "")
}

/// Group the `id:cfg` tokens of a `::`-joined cfg value by id.
///
/// Tokens sharing an id are joined with `,`. Every id must be one of
/// `valid_ids`.
///
/// # Example
/// ```
/// use cfgtree_core::params::multi_cfg_groups;
///
/// let groups = multi_cfg_groups("0:a:b::1:c::0:d", &["0", "1"]).unwrap();
/// assert_eq!(groups["0"], "a:b,d");
/// assert_eq!(groups["1"], "c");
/// ```
pub fn multi_cfg_groups(cfgs: &str, valid_ids: &[&str]) -> Result<BTreeMap<String, String>> {
    let mut groups: BTreeMap<String, String> = BTreeMap::new();
    if cfgs.is_empty() {
        return Ok(groups);
    }
    for token in cfgs.split("::") {
        let (id, cfg) = token.split_once(':').unwrap_or((token, ""));
        if !valid_ids.contains(&id) {
            return Err(Error::invalid_value(
                "multi_cfg",
                token,
                format!("invalid cfg id {id}"),
            ));
        }
        groups
            .entry(id.to_string())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(cfg);
            })
            .or_insert_with(|| cfg.to_string());
    }
    Ok(groups)
}
