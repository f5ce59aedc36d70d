//! The rule data model.

use serde_json::{Map, Value};

use crate::{executor, Action, Condition, ExecutionResult, PolicyVerdict};

/// A declarative travel-policy rule: an ordered conjunction of conditions plus an
/// ordered sequence of actions.
///
/// Rules are constructed externally (by NL synthesis or a UI form) and passed by
/// value into the executor; the executor never mutates a rule. Deserialization is
/// lenient: every field defaults, and unrecognized fields are ignored, so partial or
/// over-decorated rule JSON still parses.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Rule {
    /// Identifier for this rule, opaque to the engine.
    #[serde(default)]
    pub rule_id: String,
    /// Human-readable rule name; NL synthesis puts the intent name here.
    #[serde(default)]
    pub name: String,
    /// Conditions, AND-ed in order. The first failing condition is the one reported.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Actions, executed in order against a shared working payload copy.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Relative priority, opaque to the engine (single-rule evaluation).
    #[serde(default)]
    pub priority: i64,
    /// Free-form provenance metadata.
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl Rule {
    /// Execute this rule against a payload. See [`crate::execute_rule`].
    ///
    /// The payload is cloned; the caller's value is never mutated. A non-object
    /// payload evaluates as an empty one.
    pub fn execute(&self, payload: &Value) -> ExecutionResult {
        executor::run(self, payload.as_object().cloned().unwrap_or_default())
    }

    /// Check this rule as an out-of-policy trigger. See [`crate::execute_policy`].
    pub fn check_policy(&self, payload: &Value) -> PolicyVerdict {
        let empty = Map::new();
        executor::check(self, payload.as_object().unwrap_or(&empty))
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
