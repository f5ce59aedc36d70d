#![deny(missing_docs)]

//! ZenRules: a JSON rule DSL and executor for travel-policy decisions.
//!
//! ZenRules evaluates declarative rules against booking payloads. A rule is an
//! ordered conjunction of conditions plus an ordered sequence of actions; executing
//! it yields a structured result describing which condition failed (if any), which
//! actions were applied, the transformed payload, and a policy verdict.
//!
//! Rules arrive as untrusted JSON, typically synthesized from natural language or
//! edited in a UI, so every failure mode is fail-closed: unresolvable attributes,
//! type mismatches, and unrecognized operators make a condition false; unrecognized
//! actions become inert records with a warning. The evaluation API never returns an
//! error and never panics on malformed input.
//!
//! # Core Concepts
//!
//! - **Condition**: a single attribute/operator/value predicate over a payload
//! - **Action**: a named payload mutation with parameters
//! - **Rule**: an ordered conjunction of conditions plus ordered actions
//! - **ExecutionResult**: the outcome of one evaluation, including the policy verdict
//! - **PolicyVerdict**: the minimal in-policy projection used by the policy-check path
//!
//! # Example
//!
//! ```
//! use zenrules::execute_rule;
//!
//! let rule = serde_json::json! {{
//!     "rule_id": "r1",
//!     "name": "booking_window_discount",
//!     "conditions": [
//!         {"attribute": "product_type", "operator": "==", "value": "flight"},
//!         {"attribute": "booking_window_days", "operator": ">=", "value": 30}
//!     ],
//!     "actions": [
//!         {"action": "apply_discount", "params": {"value": 10, "type": "percent"}}
//!     ]
//! }};
//! let payload = serde_json::json! {{
//!     "product_type": "flight",
//!     "price": 200.0,
//!     "booking_window_days": 30
//! }};
//! let result = execute_rule(&rule, &payload);
//! assert!(result.matched);
//! assert_eq!(
//!     result.resulting_payload["price_after_discount"],
//!     serde_json::json!(180.0)
//! );
//! ```

/// Sample payloads, example rules, and seeded test-data generation
pub mod data;

/// Rule templates and slot-driven rule synthesis
pub mod templates;

mod action;
mod condition;
mod executor;
mod operator;
mod path;
mod rule;

pub use action::{Action, ActionName, AppliedAction};
pub use condition::Condition;
pub use executor::{
    execute_policy, execute_rule, ExecutionResult, PolicyStatus, PolicyVerdict, Reason,
};
pub use operator::Operator;
pub use path::{lookup_path, store_path};
pub use rule::Rule;

//////////////////////////////////////////// Number Helpers ///////////////////////////////////////

/// Interpret a JSON value as a float for comparison purposes.
///
/// Numbers convert directly. Strings are parsed after trimming whitespace, because UI
/// forms and NL extraction deliver numeric fields as text more often than not.
pub(crate) fn coerce_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Approximate float equality with a relative tolerance of 1e-9.
pub(crate) fn floats_are_close(lhs: f64, rhs: f64) -> bool {
    if lhs == rhs {
        return true;
    }
    (lhs - rhs).abs() <= 1e-9 * lhs.abs().max(rhs.abs())
}

pub(crate) fn number_is_equal(lhs: &serde_json::Number, rhs: &serde_json::Number) -> bool {
    if lhs.is_u64() && rhs.is_u64() {
        lhs.as_u64() == rhs.as_u64()
    } else if lhs.is_i64() && rhs.is_i64() {
        lhs.as_i64() == rhs.as_i64()
    } else {
        // Compare across different number types by converting to f64
        match (lhs.as_f64(), rhs.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
