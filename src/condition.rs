//! Condition evaluation.
//!
//! A condition is one predicate over a payload attribute. Evaluation is total:
//! payloads and rule values arrive from heterogeneous sources (UI forms, NL
//! extraction), so every type mismatch, missing attribute, and unsupported operator
//! degrades to "condition not satisfied" instead of an error.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::{coerce_to_f64, floats_are_close, lookup_path, number_is_equal, Operator};

/// A single predicate over a payload attribute.
///
/// # Example
///
/// ```
/// use zenrules::{Condition, Operator};
///
/// let condition = Condition::new(
///     "booking_window_days",
///     Operator::GreaterThanOrEqual,
///     serde_json::json!(30),
/// );
/// let payload = serde_json::json! {{"booking_window_days": 45}};
/// assert!(condition.evaluate(payload.as_object().unwrap()));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Condition {
    /// Dot-separated path of the payload attribute this condition inspects.
    #[serde(default)]
    pub attribute: String,
    /// The comparison operator.
    #[serde(default)]
    pub operator: Operator,
    /// The right-hand operand.
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    /// Construct a condition from its parts.
    pub fn new(attribute: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value,
        }
    }

    /// Evaluate this condition against a payload.
    ///
    /// Never fails. A comparison against a missing or null attribute is false for
    /// every operator except `is_null`; membership against a haystack that does not
    /// support membership is false for both `in` and `not_in`; an unrecognized
    /// operator is false.
    pub fn evaluate(&self, payload: &Map<String, Value>) -> bool {
        let resolved = lookup_path(payload, &self.attribute);
        match &self.operator {
            Operator::IsNotNull => !is_nullish(resolved),
            Operator::IsNull => is_nullish(resolved),
            Operator::In => membership(resolved, &self.value).unwrap_or(false),
            Operator::NotIn => membership(resolved, &self.value)
                .map(|found| !found)
                .unwrap_or(false),
            Operator::Equal
            | Operator::NotEqual
            | Operator::LessThan
            | Operator::LessThanOrEqual
            | Operator::GreaterThan
            | Operator::GreaterThanOrEqual => {
                let Some(left) = resolved.filter(|v| !v.is_null()) else {
                    return false;
                };
                compare(&self.operator, left, &self.value)
            }
            Operator::Unknown(_) => false,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.operator, self.value)
    }
}

/// Absent, null, and the empty string all count as null for the null-check operators.
fn is_nullish(resolved: Option<&Value>) -> bool {
    match resolved {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Membership of the resolved value in a haystack.
///
/// Arrays test element equality (numbers compare across representations, no
/// tolerance), string haystacks test substring containment of a string needle, and
/// object haystacks test key membership of a string needle. `None` means the haystack
/// type does not support membership at all, which makes `in` and `not_in` both false.
fn membership(resolved: Option<&Value>, haystack: &Value) -> Option<bool> {
    let needle = resolved.unwrap_or(&Value::Null);
    match haystack {
        Value::Array(items) => Some(items.iter().any(|item| values_equal(needle, item))),
        Value::String(s) => match needle {
            Value::String(n) => Some(s.contains(n.as_str())),
            _ => None,
        },
        Value::Object(map) => match needle {
            Value::String(n) => Some(map.contains_key(n)),
            _ => None,
        },
        _ => None,
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => number_is_equal(l, r),
        _ => lhs == rhs,
    }
}

fn compare(operator: &Operator, left: &Value, right: &Value) -> bool {
    // Numeric coercion path: when either operand is a JSON number, try to compare
    // both sides as floats. A side that will not coerce (a non-numeric string, say)
    // falls through to the generic path.
    if left.is_number() || right.is_number() {
        if let (Some(l), Some(r)) = (coerce_to_f64(left), coerce_to_f64(right)) {
            return match operator {
                Operator::Equal => floats_are_close(l, r),
                Operator::NotEqual => !floats_are_close(l, r),
                Operator::LessThan => l < r,
                Operator::LessThanOrEqual => l <= r,
                Operator::GreaterThan => l > r,
                Operator::GreaterThanOrEqual => l >= r,
                _ => false,
            };
        }
    }
    match operator {
        Operator::Equal => left == right,
        Operator::NotEqual => left != right,
        Operator::LessThan => matches!(value_ordering(left, right), Some(Ordering::Less)),
        Operator::LessThanOrEqual => matches!(
            value_ordering(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::GreaterThan => matches!(value_ordering(left, right), Some(Ordering::Greater)),
        Operator::GreaterThanOrEqual => matches!(
            value_ordering(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        _ => false,
    }
}

/// Native ordering between two JSON values, `None` when the types are unorderable.
fn value_ordering(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::Array(l), Value::Array(r)) => {
            for (a, b) in l.iter().zip(r.iter()) {
                match value_ordering(a, b)? {
                    Ordering::Equal => continue,
                    unequal => return Some(unequal),
                }
            }
            Some(l.len().cmp(&r.len()))
        }
        _ => None,
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
