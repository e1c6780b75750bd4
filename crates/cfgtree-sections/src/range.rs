//! Range and list grammar
//!
//! Shared by template headings and by sequence values:
//!
//! - `range(a,b[,step])`: integers, exclusive end.
//! - `irange(a,b[,step])`: integers, inclusive end.
//! - `a:b[:step]`: floats, inclusive on both ends by default. A leading `(`
//!   makes the start exclusive, a trailing `)` the end; `[` and `]` are
//!   accepted as explicit inclusive markers.
//! - `(a,b,c)` / `[a,b,c]`: literal list.
//! - `a,b,c`: plain list, trailing comma allowed.
//!
//! [`parse_axis`] additionally concatenates `+`-joined specs.

use crate::{Error, Result};
use std::fmt;

const MULTIPLIERS: [(char, u32); 5] = [('k', 3), ('m', 6), ('g', 9), ('t', 12), ('p', 15)];

/// Decimal places kept for generated float values.
const FLOAT_DECIMALS: i32 = 12;

/// Tolerance used when counting float range elements.
const COUNT_EPSILON: f64 = 1e-9;

/// Upper bound on the number of values a single range may generate.
const MAX_RANGE_VALUES: usize = 1_000_000;

/// A single generated or parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Most specific scalar for a token: integer, then float, then string.
    ///
    /// Integers accept a `k`, `m`, `g`, `t` or `p` multiplier suffix
    /// (`10k` is 10000). Strings lose surrounding quotes and the `__n__`
    /// marker stands for the empty string.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Scalar::Str(String::new());
        }
        if let Some(value) = parse_multiplied(token) {
            return Scalar::Int(value);
        }
        if let Ok(value) = token.parse::<i64>() {
            return Scalar::Int(value);
        }
        if let Ok(value) = token.parse::<f64>() {
            return Scalar::Float(value);
        }
        match strip_quotes(token) {
            "__n__" => Scalar::Str(String::new()),
            other => Scalar::Str(other.to_string()),
        }
    }

    /// Token usable inside a section name; negative numbers become `n<abs>`.
    pub fn to_section_token(&self) -> String {
        match self {
            Scalar::Int(n) if *n < 0 => format!("n{}", n.unsigned_abs()),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(x) if *x < 0.0 => format!("n{}", float_text(-x)),
            Scalar::Float(x) => float_text(*x),
            Scalar::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Float text that always reads back as a float: `1.0`, `0.25`.
pub fn float_text(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

/// Remove surrounding single quotes, then double quotes.
pub fn strip_quotes(token: &str) -> &str {
    token.trim_matches('\'').trim_matches('"')
}

fn parse_multiplied(token: &str) -> Option<i64> {
    let suffix = token.chars().last()?;
    let (_, exponent) = MULTIPLIERS.iter().find(|(c, _)| *c == suffix)?;
    let digits = &token[..token.len() - 1];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()?.checked_mul(10_i64.checked_pow(*exponent)?)
}

/// Parse one `+`-joined axis of a template name into its values.
///
/// # Example
/// ```
/// use cfgtree_sections::range::{parse_axis, Scalar};
///
/// let values = parse_axis("range(0,2)+irange(5,6)").unwrap();
/// assert_eq!(
///     values,
///     vec![Scalar::Int(0), Scalar::Int(1), Scalar::Int(5), Scalar::Int(6)]
/// );
/// ```
pub fn parse_axis(axis: &str) -> Result<Vec<Scalar>> {
    let mut values = Vec::new();
    for part in axis.split('+') {
        values.extend(parse_range(part)?);
    }
    Ok(values)
}

/// Parse a single range or list specification.
///
/// Malformed numeric ranges are errors rather than being taken literally.
pub fn parse_range(spec: &str) -> Result<Vec<Scalar>> {
    let spec = spec.trim();

    if let Some(args) = spec.strip_prefix("irange(") {
        let (start, stop, step) = int_range_args(spec, args)?;
        let stop = stop
            .checked_add(step.signum())
            .ok_or_else(|| Error::range(spec, "bound overflows"))?;
        return int_range(spec, start, stop, step);
    }
    if let Some(args) = spec.strip_prefix("range(") {
        let (start, stop, step) = int_range_args(spec, args)?;
        return int_range(spec, start, stop, step);
    }
    if spec.contains(':') {
        return colon_range(spec);
    }
    if let Some(inner) = bracket_inner(spec) {
        return Ok(list_items(inner).into_iter().map(Scalar::parse).collect());
    }
    if spec.starts_with(['(', '[']) {
        return Err(Error::range(spec, "unbalanced brackets"));
    }
    Ok(list_items(spec).into_iter().map(Scalar::parse).collect())
}

fn int_range_args(spec: &str, args: &str) -> Result<(i64, i64, i64)> {
    let args = args
        .strip_suffix(')')
        .ok_or_else(|| Error::range(spec, "missing closing parenthesis"))?;
    let numbers = args
        .split(',')
        .map(|arg| {
            arg.trim()
                .parse::<i64>()
                .map_err(|_| Error::range(spec, format!("'{}' is not an integer", arg.trim())))
        })
        .collect::<Result<Vec<_>>>()?;

    let (start, stop, step) = match numbers.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(Error::range(spec, "expected one to three arguments")),
    };
    if step == 0 {
        return Err(Error::range(spec, "step must not be zero"));
    }
    Ok((start, stop, step))
}

fn int_range(spec: &str, start: i64, stop: i64, step: i64) -> Result<Vec<Scalar>> {
    let span = i128::from(stop) - i128::from(start);
    let step_wide = i128::from(step);
    let count = if span.signum() == step_wide.signum() {
        (span + step_wide - step_wide.signum()) / step_wide
    } else {
        0
    };
    if count > MAX_RANGE_VALUES as i128 {
        return Err(Error::range(spec, "too many values"));
    }

    let mut values = Vec::with_capacity(count as usize);
    let mut current = Some(start);
    while let Some(value) = current {
        if !((step > 0 && value < stop) || (step < 0 && value > stop)) {
            break;
        }
        values.push(Scalar::Int(value));
        current = value.checked_add(step);
    }
    Ok(values)
}

fn colon_range(spec: &str) -> Result<Vec<Scalar>> {
    let mut body = spec;
    let mut inclusive_start = true;
    let mut inclusive_end = true;

    if let Some(rest) = body.strip_prefix('(') {
        body = rest;
        inclusive_start = false;
    } else if let Some(rest) = body.strip_prefix('[') {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix(')') {
        body = rest;
        inclusive_end = false;
    } else if let Some(rest) = body.strip_suffix(']') {
        body = rest;
    }

    let bounds = body
        .split(':')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| Error::range(spec, format!("'{}' is not a number", part.trim())))
        })
        .collect::<Result<Vec<_>>>()?;

    let (start, stop, step) = match bounds.as_slice() {
        [start, stop] => (*start, *stop, 1.0),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(Error::range(spec, "expected start:stop or start:stop:step")),
    };
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return Err(Error::range(spec, "bounds and step must be finite, step non-zero"));
    }

    let first = if inclusive_start { start } else { start + step };
    let bound = if inclusive_end { stop + step } else { stop };
    let offset = first / step;
    let count = (bound / step - offset - COUNT_EPSILON).ceil().max(0.0);
    if count > MAX_RANGE_VALUES as f64 {
        return Err(Error::range(spec, "too many values"));
    }
    Ok(float_steps(offset, count as usize, step))
}

/// `step * [offset, offset + count)` so that values do not drift.
fn float_steps(offset: f64, count: usize, step: f64) -> Vec<Scalar> {
    let scale = 10_f64.powi(FLOAT_DECIMALS);
    (0..count)
        .map(|i| {
            let value = (step * (offset + i as f64) * scale).round() / scale;
            Scalar::Float(if value == 0.0 { 0.0 } else { value })
        })
        .collect()
}

fn bracket_inner(spec: &str) -> Option<&str> {
    let close = match spec.chars().next()? {
        '(' => ')',
        '[' => ']',
        _ => return None,
    };
    if spec.len() >= 2 && spec.ends_with(close) {
        Some(&spec[1..spec.len() - 1])
    } else {
        None
    }
}

/// Items of a comma list; a trailing comma adds no item.
pub fn list_items(spec: &str) -> Vec<&str> {
    let mut items = split_top_level(spec, ',');
    if items.last().is_some_and(|item| item.trim().is_empty()) {
        items.pop();
    }
    items
}

/// Split on `separator` outside of brackets, braces and quotes.
///
/// # Example
/// ```
/// use cfgtree_sections::range::split_top_level;
///
/// assert_eq!(split_top_level("a,(b,c),'d,e'", ','), vec!["a", "(b,c)", "'d,e'"]);
/// ```
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (pos, c) in text.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                _ if c == separator && depth == 0 => {
                    items.push(&text[start..pos]);
                    start = pos + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    if start < text.len() || !items.is_empty() {
        items.push(&text[start..]);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ints(values: &[i64]) -> Vec<Scalar> {
        values.iter().copied().map(Scalar::Int).collect()
    }

    #[rstest]
    #[case("range(2,5)", &[2, 3, 4])]
    #[case("irange(2,5)", &[2, 3, 4, 5])]
    #[case("range(3)", &[0, 1, 2])]
    #[case("range(0,10,4)", &[0, 4, 8])]
    #[case("irange(0,8,4)", &[0, 4, 8])]
    #[case("irange(3,1,-1)", &[3, 2, 1])]
    fn integer_ranges(#[case] spec: &str, #[case] expected: &[i64]) {
        assert_eq!(parse_range(spec).unwrap(), ints(expected));
    }

    #[test]
    fn colon_range_is_inclusive_by_default() {
        let values = parse_range("0:1:0.25").unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Float(0.0),
                Scalar::Float(0.25),
                Scalar::Float(0.5),
                Scalar::Float(0.75),
                Scalar::Float(1.0)
            ]
        );
    }

    #[test]
    fn colon_range_exclusive_markers() {
        let values = parse_range("(0:1:0.25)").unwrap();
        assert_eq!(
            values,
            vec![Scalar::Float(0.25), Scalar::Float(0.5), Scalar::Float(0.75)]
        );
    }

    #[test]
    fn float_tokens_keep_their_decimal_point() {
        let tokens: Vec<String> = parse_range("[0:1:0.5]")
            .unwrap()
            .iter()
            .map(Scalar::to_section_token)
            .collect();
        assert_eq!(tokens, vec!["0.0", "0.5", "1.0"]);
        assert_eq!(Scalar::Float(-1.0).to_section_token(), "n1.0");
        assert_eq!(Scalar::Int(-3).to_section_token(), "n3");
    }

    #[test]
    fn ranges_near_integer_limits() {
        assert!(matches!(
            parse_range("irange(0,9223372036854775807)"),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            parse_range("range(0,9223372036854775807)"),
            Err(Error::InvalidRange { .. })
        ));
        assert_eq!(
            parse_range("range(9223372036854775806,9223372036854775807)").unwrap(),
            vec![Scalar::Int(i64::MAX - 1)]
        );
        assert_eq!(
            parse_range("irange(9223372036854775805,9223372036854775806,2)").unwrap(),
            vec![Scalar::Int(i64::MAX - 2)]
        );
        assert!(matches!(
            parse_range("0:1e12:0.5"),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn tenth_steps_do_not_drift() {
        let values = parse_range("0:1:0.1").unwrap();
        assert_eq!(values.len(), 11);
        assert_eq!(values[3], Scalar::Float(0.3));
        assert_eq!(values[10], Scalar::Float(1.0));
    }

    #[rstest]
    #[case("range(a,3)")]
    #[case("range(0,3,0)")]
    #[case("range(0,3")]
    #[case("0:x")]
    #[case("0:1:0")]
    #[case("(1,2")]
    fn malformed_ranges_are_errors(#[case] spec: &str) {
        assert!(matches!(
            parse_range(spec),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn bracket_list_keeps_identifiers() {
        assert_eq!(
            parse_range("(x,y)").unwrap(),
            vec![Scalar::Str("x".into()), Scalar::Str("y".into())]
        );
    }

    #[test]
    fn multiplier_suffixes() {
        assert_eq!(Scalar::parse("10k"), Scalar::Int(10_000));
        assert_eq!(Scalar::parse("2m"), Scalar::Int(2_000_000));
        assert_eq!(Scalar::parse("k"), Scalar::Str("k".into()));
    }

    #[test]
    fn negative_values_render_with_n_prefix() {
        assert_eq!(Scalar::Int(-3).to_section_token(), "n3");
        assert_eq!(Scalar::Float(-0.5).to_section_token(), "n0.5");
        assert_eq!(Scalar::Float(2.0).to_section_token(), "2");
    }
}
