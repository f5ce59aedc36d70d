//! Action application.
//!
//! An action is a named payload mutation with parameters. Applying one returns an
//! applied-action record; data-level failures (no price to discount, no field to set)
//! land in the record's `error` field and leave the payload untouched, and an
//! unrecognized action name becomes an inert record with a warning so the rest of a
//! rule's action sequence still runs.

use serde_json::{Map, Value};

use crate::{coerce_to_f64, store_path};

//////////////////////////////////////////// ActionName ////////////////////////////////////////////

/// The name of an action, tagged on the wire with the strings the rule DSL uses.
///
/// Names outside the supported set deserialize to [`ActionName::Unknown`], which
/// applies as a no-op with a warning, and serialize back to the original name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ActionName {
    /// `apply_discount`: reduce `price` by a percentage or fixed amount, writing the
    /// result to `price_after_discount`. The result is rounded to cents, half away
    /// from zero.
    ApplyDiscount,
    /// `mark_out_of_policy`: set `policy_flags.out_of_policy_rule` to true.
    MarkOutOfPolicy,
    /// `set_field`: write a value at a dotted path inside the payload.
    SetField,
    /// Any unrecognized name, preserved verbatim. Applies as a no-op.
    Unknown(String),
}

impl ActionName {
    /// Parse a wire name. Unrecognized names become [`ActionName::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "apply_discount" => Self::ApplyDiscount,
            "mark_out_of_policy" => Self::MarkOutOfPolicy,
            "set_field" => Self::SetField,
            _ => Self::Unknown(name.to_string()),
        }
    }

    /// The wire name for this action.
    pub fn as_name(&self) -> &str {
        match self {
            Self::ApplyDiscount => "apply_discount",
            Self::MarkOutOfPolicy => "mark_out_of_policy",
            Self::SetField => "set_field",
            Self::Unknown(name) => name,
        }
    }
}

impl Default for ActionName {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_name())
    }
}

impl serde::Serialize for ActionName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_name())
    }
}

impl<'de> serde::Deserialize<'de> for ActionName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

////////////////////////////////////////////// Action //////////////////////////////////////////////

/// One payload mutation in a rule's action sequence.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Action {
    /// The action name.
    #[serde(default)]
    pub action: ActionName,
    /// Parameters for the action.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Action {
    /// Construct an action from its parts.
    pub fn new(action: ActionName, params: Map<String, Value>) -> Self {
        Self { action, params }
    }

    /// Apply this action to a working payload copy, returning the applied-action
    /// record.
    ///
    /// Failures never escape: a missing `price`, a bad parameter, or an unrecognized
    /// action name land in the record's `error`/`warning` fields and the payload is
    /// left untouched.
    pub fn apply(&self, payload: &mut Map<String, Value>) -> AppliedAction {
        let mut record = AppliedAction::of(self);
        match &self.action {
            ActionName::ApplyDiscount => self.apply_discount(payload, &mut record),
            ActionName::MarkOutOfPolicy => {
                store_path(payload, "policy_flags.out_of_policy_rule", Value::Bool(true));
            }
            ActionName::SetField => self.set_field(payload, &mut record),
            ActionName::Unknown(_) => {
                record.warning = Some("unknown_action".to_string());
            }
        }
        record
    }

    fn apply_discount(&self, payload: &mut Map<String, Value>, record: &mut AppliedAction) {
        let price = match payload.get("price") {
            Some(price) if !price.is_null() => price,
            _ => {
                record.error = Some("no_price_field".to_string());
                return;
            }
        };
        let Some(price) = coerce_to_f64(price) else {
            record.error = Some("discount_error:price_not_numeric".to_string());
            return;
        };
        let Some(value) = self.params.get("value").and_then(coerce_to_f64) else {
            record.error = Some("discount_error:value_not_numeric".to_string());
            return;
        };
        // Any type other than "percent" (including a missing-but-non-string one) is a
        // fixed amount; only an absent param defaults to percent.
        let percent = match self.params.get("type") {
            None => true,
            Some(Value::String(s)) => s == "percent",
            Some(_) => false,
        };
        let new_price = if percent {
            price * (1.0 - value / 100.0)
        } else {
            (price - value).max(0.0)
        };
        let new_price = (new_price * 100.0).round() / 100.0;
        match serde_json::Number::from_f64(new_price) {
            Some(n) => {
                payload.insert("price_after_discount".to_string(), Value::Number(n));
                record.resulting_price = Some(new_price);
            }
            None => {
                record.error = Some("discount_error:result_not_finite".to_string());
            }
        }
    }

    fn set_field(&self, payload: &mut Map<String, Value>, record: &mut AppliedAction) {
        let field = match self.params.get("field") {
            Some(Value::String(field)) if !field.is_empty() => field.clone(),
            _ => {
                record.error = Some("no_field".to_string());
                return;
            }
        };
        let value = self.params.get("value").cloned().unwrap_or(Value::Null);
        store_path(payload, &field, value.clone());
        record.set_field = Some(field);
        record.set_value = Some(value);
    }
}

/////////////////////////////////////////// AppliedAction //////////////////////////////////////////

/// The record produced by applying one action.
///
/// Echoes the action's name and parameters and carries whatever the action produced:
/// a resulting price, the field/value a `set_field` wrote, or an in-band `error` /
/// `warning` string. Absent fields are omitted from the JSON form.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AppliedAction {
    /// The action name, echoed from the rule (unknown names are preserved).
    pub action: ActionName,
    /// The action parameters, echoed from the rule.
    pub params: Map<String, Value>,
    /// The new price written by `apply_discount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting_price: Option<f64>,
    /// The path written by `set_field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_field: Option<String>,
    /// The value written by `set_field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_value: Option<Value>,
    /// Data-level failure that prevented this action from mutating the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal notice, e.g. `unknown_action`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl AppliedAction {
    fn of(action: &Action) -> Self {
        Self {
            action: action.action.clone(),
            params: action.params.clone(),
            resulting_price: None,
            set_field: None,
            set_value: None,
            error: None,
            warning: None,
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
