//! Rule execution and the minimal policy check.
//!
//! Two entry points share the condition evaluator but use it with opposite meaning.
//! [`execute_rule`] treats conditions as eligibility to act: all conditions must hold
//! before the action sequence runs. [`execute_policy`] treats conditions as the
//! trigger for a violation: only when every condition holds is the payload out of
//! policy. The two are kept distinct on purpose; collapsing them would silently
//! invert policy outcomes.
//!
//! No input shape makes either entry point fail. Malformed rules, unmet conditions,
//! and per-action errors all come back as data on the result.

use serde_json::{Map, Value};

use crate::{ActionName, AppliedAction, Condition, Rule};

////////////////////////////////////////////// Reason //////////////////////////////////////////////

/// Why an execution ended the way it did.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Reason {
    /// The rule was not a well-formed, non-empty JSON object.
    #[serde(rename = "invalid_rule")]
    InvalidRule,
    /// At least one condition evaluated false.
    #[serde(rename = "conditions_not_met")]
    ConditionsNotMet,
    /// All conditions held and the action sequence ran.
    #[serde(rename = "actions_executed")]
    ActionsExecuted,
}

/////////////////////////////////////////// PolicyStatus ///////////////////////////////////////////

/// The policy verdict derived from an execution's action trace.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum PolicyStatus {
    /// No applied action marked the payload out of policy.
    #[serde(rename = "in_policy")]
    InPolicy,
    /// At least one applied action was `mark_out_of_policy`.
    #[serde(rename = "out_of_policy")]
    OutOfPolicy,
}

////////////////////////////////////////// ExecutionResult /////////////////////////////////////////

/// The full outcome of executing one rule against one payload.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ExecutionResult {
    /// Whether every condition held.
    pub matched: bool,
    /// Why the execution ended the way it did.
    pub reason: Reason,
    /// The first condition that evaluated false, when `reason` is
    /// `conditions_not_met`.
    pub failed_condition: Option<Condition>,
    /// One record per action, in execution order. One action's error does not stop
    /// the actions after it.
    pub actions_applied: Vec<AppliedAction>,
    /// The working payload copy after any actions ran. The caller's payload is never
    /// mutated.
    pub resulting_payload: Map<String, Value>,
    /// False iff any applied action was `mark_out_of_policy`.
    pub in_policy: bool,
    /// [`ExecutionResult::in_policy`] as a wire enum.
    pub policy_status: PolicyStatus,
    /// Human-readable one-line summary of what happened.
    pub explanation: String,
}

/////////////////////////////////////////// PolicyVerdict //////////////////////////////////////////

/// The minimal projection returned by the policy-check path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PolicyVerdict {
    /// Whether the payload stays in policy.
    pub in_policy: bool,
}

///////////////////////////////////////////// Executor /////////////////////////////////////////////

/// Execute a rule against a payload.
///
/// Conditions are AND-ed in order with short-circuit: the first condition that
/// evaluates false is reported as `failed_condition` and the conditions after it are
/// never evaluated. If all conditions hold (an empty condition list trivially
/// matches), every action runs in order against one shared working copy of the
/// payload, so later actions observe earlier actions' writes.
///
/// Both inputs are cloned up front; the caller's values are never mutated. A rule
/// that is not a well-formed, non-empty JSON object (or whose `conditions`/`actions`
/// are structurally broken) comes back as `reason = "invalid_rule"` rather than an
/// error.
pub fn execute_rule(rule: &Value, payload: &Value) -> ExecutionResult {
    let working = payload.as_object().cloned().unwrap_or_default();
    match parse_rule(rule) {
        Some(rule) => run(&rule, working),
        None => invalid(working),
    }
}

/// Check a policy rule whose conditions describe the trigger for being out of policy.
///
/// Inverted semantics relative to [`execute_rule`]: if the rule is malformed or has
/// no conditions the payload is vacuously in policy; if any condition fails the
/// trigger did not fire and the payload is in policy; only when every condition holds
/// is the payload out of policy.
pub fn execute_policy(rule: &Value, payload: &Value) -> PolicyVerdict {
    let empty = Map::new();
    let payload = payload.as_object().unwrap_or(&empty);
    // No empty-object rejection here: a mapping with no conditions is a valid,
    // vacuously-satisfied policy.
    let parsed = rule
        .as_object()
        .and_then(|_| serde_json::from_value::<Rule>(rule.clone()).ok());
    match parsed {
        Some(rule) => check(&rule, payload),
        None => PolicyVerdict { in_policy: true },
    }
}

fn parse_rule(rule: &Value) -> Option<Rule> {
    let object = rule.as_object()?;
    if object.is_empty() {
        return None;
    }
    serde_json::from_value(rule.clone()).ok()
}

pub(crate) fn run(rule: &Rule, mut payload: Map<String, Value>) -> ExecutionResult {
    for condition in &rule.conditions {
        if !condition.evaluate(&payload) {
            let explanation = format!("Condition not satisfied: {condition}.");
            return ExecutionResult {
                matched: false,
                reason: Reason::ConditionsNotMet,
                failed_condition: Some(condition.clone()),
                actions_applied: vec![],
                resulting_payload: payload,
                in_policy: true,
                policy_status: PolicyStatus::InPolicy,
                explanation,
            };
        }
    }
    let mut actions_applied = Vec::with_capacity(rule.actions.len());
    for action in &rule.actions {
        actions_applied.push(action.apply(&mut payload));
    }
    let in_policy = !actions_applied
        .iter()
        .any(|applied| applied.action == ActionName::MarkOutOfPolicy);
    let explanation = if actions_applied.is_empty() {
        "Conditions matched. No actions applied.".to_string()
    } else {
        let names = actions_applied
            .iter()
            .map(|applied| applied.action.as_name())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Conditions matched. Actions applied: {names}.")
    };
    ExecutionResult {
        matched: true,
        reason: Reason::ActionsExecuted,
        failed_condition: None,
        actions_applied,
        resulting_payload: payload,
        in_policy,
        policy_status: if in_policy {
            PolicyStatus::InPolicy
        } else {
            PolicyStatus::OutOfPolicy
        },
        explanation,
    }
}

pub(crate) fn check(rule: &Rule, payload: &Map<String, Value>) -> PolicyVerdict {
    if rule.conditions.is_empty() {
        return PolicyVerdict { in_policy: true };
    }
    for condition in &rule.conditions {
        if !condition.evaluate(payload) {
            return PolicyVerdict { in_policy: true };
        }
    }
    PolicyVerdict { in_policy: false }
}

fn invalid(payload: Map<String, Value>) -> ExecutionResult {
    ExecutionResult {
        matched: false,
        reason: Reason::InvalidRule,
        failed_condition: None,
        actions_applied: vec![],
        resulting_payload: payload,
        in_policy: true,
        policy_status: PolicyStatus::InPolicy,
        explanation: String::new(),
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn discount_rule() -> Value {
        serde_json::json! {{
            "rule_id": "r1",
            "name": "booking_window_discount",
            "conditions": [
                {"attribute": "product_type", "operator": "==", "value": "flight"},
                {"attribute": "booking_window_days", "operator": ">=", "value": 30}
            ],
            "actions": [
                {"action": "apply_discount", "params": {"value": 10, "type": "percent"}}
            ],
            "priority": 1,
            "meta": {"source": "test"}
        }}
    }

    fn flight_payload() -> Value {
        serde_json::json! {{
            "product_type": "flight",
            "price": 200.0,
            "booking_window_days": 30
        }}
    }

    #[test]
    fn discount_end_to_end() {
        let result = execute_rule(&discount_rule(), &flight_payload());
        assert!(result.matched);
        assert_eq!(Reason::ActionsExecuted, result.reason);
        assert_eq!(None, result.failed_condition);
        assert_eq!(1, result.actions_applied.len());
        assert_eq!(Some(180.0), result.actions_applied[0].resulting_price);
        assert_eq!(
            serde_json::json!(180.0),
            result.resulting_payload["price_after_discount"]
        );
        assert!(result.in_policy);
        assert_eq!(PolicyStatus::InPolicy, result.policy_status);
        assert_eq!(
            "Conditions matched. Actions applied: apply_discount.",
            result.explanation
        );
    }

    #[test]
    fn conditions_not_met_reports_first_failure_and_short_circuits() {
        // C2 fails; C3 is deliberately malformed and must never be evaluated (and
        // must not fail the call even if it were).
        let rule = serde_json::json! {{
            "name": "short_circuit",
            "conditions": [
                {"attribute": "product_type", "operator": "==", "value": "flight"},
                {"attribute": "booking_window_days", "operator": ">=", "value": 60},
                {"attribute": "product_type", "operator": "explode", "value": {"bad": []}}
            ],
            "actions": [
                {"action": "apply_discount", "params": {"value": 10}}
            ]
        }};
        let result = execute_rule(&rule, &flight_payload());
        assert!(!result.matched);
        assert_eq!(Reason::ConditionsNotMet, result.reason);
        let failed = result.failed_condition.expect("second condition failed");
        assert_eq!("booking_window_days", failed.attribute);
        assert_eq!(serde_json::json!(60), failed.value);
        assert!(result.actions_applied.is_empty());
        assert_eq!(
            flight_payload().as_object().unwrap(),
            &result.resulting_payload
        );
        assert!(result.in_policy);
        assert_eq!(
            "Condition not satisfied: booking_window_days >= 60.",
            result.explanation
        );
    }

    #[test]
    fn empty_conditions_always_match() {
        let rule = serde_json::json! {{"name": "vacuous", "conditions": [], "actions": []}};
        let result = execute_rule(&rule, &flight_payload());
        assert!(result.matched);
        assert_eq!(Reason::ActionsExecuted, result.reason);
        assert_eq!("Conditions matched. No actions applied.", result.explanation);

        let result = execute_rule(&rule, &serde_json::json!({}));
        assert!(result.matched);
    }

    #[test]
    fn invalid_rule_shapes() {
        for rule in [
            serde_json::json!(null),
            serde_json::json!("rule"),
            serde_json::json!(42),
            serde_json::json!(["conditions"]),
            serde_json::json!({}),
            serde_json::json!({"conditions": "not an array"}),
            serde_json::json!({"conditions": [42]}),
            serde_json::json!({"actions": {"action": "apply_discount"}}),
        ] {
            let result = execute_rule(&rule, &flight_payload());
            assert!(!result.matched, "{rule}");
            assert_eq!(Reason::InvalidRule, result.reason, "{rule}");
            assert_eq!(None, result.failed_condition);
            assert!(result.actions_applied.is_empty());
            assert_eq!(
                flight_payload().as_object().unwrap(),
                &result.resulting_payload
            );
            assert!(result.in_policy);
        }
    }

    #[test]
    fn non_object_payload_evaluates_as_empty() {
        let result = execute_rule(&discount_rule(), &serde_json::json!(null));
        assert!(!result.matched);
        assert!(result.resulting_payload.is_empty());
    }

    #[test]
    fn caller_inputs_are_never_mutated() {
        let rule = discount_rule();
        let payload = flight_payload();
        let rule_before = rule.clone();
        let payload_before = payload.clone();
        let result = execute_rule(&rule, &payload);
        assert!(result.matched);
        assert_eq!(rule_before, rule);
        assert_eq!(payload_before, payload);
        assert!(payload.as_object().unwrap().get("price_after_discount").is_none());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let rule = discount_rule();
        let payload = flight_payload();
        let first = execute_rule(&rule, &payload);
        let second = execute_rule(&rule, &payload);
        assert_eq!(first, second);
    }

    #[test]
    fn actions_share_one_working_copy_in_order() {
        let rule = serde_json::json! {{
            "name": "stacked",
            "conditions": [],
            "actions": [
                {"action": "set_field", "params": {"field": "price", "value": 100}},
                {"action": "apply_discount", "params": {"value": 10, "type": "percent"}}
            ]
        }};
        let result = execute_rule(&rule, &flight_payload());
        assert!(result.matched);
        // The discount sees the price the first action wrote, not the original 200.
        assert_eq!(Some(90.0), result.actions_applied[1].resulting_price);
    }

    #[test]
    fn action_error_does_not_abort_the_sequence() {
        let rule = serde_json::json! {{
            "name": "partial",
            "conditions": [],
            "actions": [
                {"action": "apply_discount", "params": {"value": 10}},
                {"action": "set_field", "params": {"field": "touched", "value": true}}
            ]
        }};
        let payload = serde_json::json! {{"product_type": "flight"}};
        let result = execute_rule(&rule, &payload);
        assert!(result.matched);
        assert_eq!(
            Some("no_price_field".to_string()),
            result.actions_applied[0].error
        );
        assert_eq!(serde_json::json!(true), result.resulting_payload["touched"]);
    }

    #[test]
    fn unknown_action_still_returns_normally() {
        let rule = serde_json::json! {{
            "name": "forward_compatible",
            "conditions": [],
            "actions": [{"action": "teleport_customer", "params": {}}]
        }};
        let payload = flight_payload();
        let result = execute_rule(&rule, &payload);
        assert!(result.matched);
        assert_eq!(
            Some("unknown_action".to_string()),
            result.actions_applied[0].warning
        );
        assert_eq!(payload.as_object().unwrap(), &result.resulting_payload);
        assert_eq!(
            "Conditions matched. Actions applied: teleport_customer.",
            result.explanation
        );
    }

    #[test]
    fn mark_out_of_policy_flips_the_verdict() {
        let rule = serde_json::json! {{
            "name": "cabin_class_policy",
            "conditions": [
                {"attribute": "cabin_class", "operator": "==", "value": "business"}
            ],
            "actions": [{"action": "mark_out_of_policy", "params": {}}]
        }};
        let payload = serde_json::json! {{"cabin_class": "business"}};
        let result = execute_rule(&rule, &payload);
        assert!(result.matched);
        assert!(!result.in_policy);
        assert_eq!(PolicyStatus::OutOfPolicy, result.policy_status);
        assert_eq!(
            serde_json::json!(true),
            result.resulting_payload["policy_flags"]["out_of_policy_rule"]
        );
    }

    #[test]
    fn result_serialization_uses_wire_enums() {
        let result = execute_rule(&discount_rule(), &flight_payload());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(serde_json::json!("actions_executed"), value["reason"]);
        assert_eq!(serde_json::json!("in_policy"), value["policy_status"]);
        assert_eq!(serde_json::json!(true), value["matched"]);
        assert_eq!(serde_json::json!(null), value["failed_condition"]);
    }

    #[test]
    fn policy_trigger_inversion() {
        let policy = serde_json::json! {{
            "name": "cheapest_direct_policy",
            "conditions": [
                {"attribute": "is_cheapest_direct", "operator": "==", "value": false}
            ]
        }};
        let verdict = execute_policy(&policy, &serde_json::json!({"is_cheapest_direct": false}));
        assert!(!verdict.in_policy, "trigger fired");
        let verdict = execute_policy(&policy, &serde_json::json!({"is_cheapest_direct": true}));
        assert!(verdict.in_policy, "trigger did not fire");
    }

    #[test]
    fn policy_partial_trigger_is_in_policy() {
        let policy = serde_json::json! {{
            "conditions": [
                {"attribute": "cabin_class", "operator": "==", "value": "business"},
                {"attribute": "manager_approval", "operator": "==", "value": false}
            ]
        }};
        let payload = serde_json::json! {{"cabin_class": "business", "manager_approval": true}};
        assert!(execute_policy(&policy, &payload).in_policy);
        let payload = serde_json::json! {{"cabin_class": "business", "manager_approval": false}};
        assert!(!execute_policy(&policy, &payload).in_policy);
    }

    #[test]
    fn policy_without_conditions_is_vacuously_in_policy() {
        assert!(execute_policy(&serde_json::json!({}), &flight_payload()).in_policy);
        assert!(execute_policy(&serde_json::json!({"conditions": []}), &flight_payload()).in_policy);
        assert!(execute_policy(&serde_json::json!(null), &flight_payload()).in_policy);
        assert!(execute_policy(&serde_json::json!("policy"), &flight_payload()).in_policy);
    }

    #[test]
    fn policy_ignores_actions() {
        let policy = serde_json::json! {{
            "conditions": [
                {"attribute": "product_type", "operator": "==", "value": "flight"}
            ],
            "actions": [{"action": "apply_discount", "params": {"value": 10}}]
        }};
        let payload = flight_payload();
        let verdict = execute_policy(&policy, &payload);
        assert!(!verdict.in_policy);
        assert!(payload.as_object().unwrap().get("price_after_discount").is_none());
    }

    #[test]
    fn typed_rule_execution_matches_wire_execution() {
        let rule: Rule = serde_json::from_value(discount_rule()).unwrap();
        let typed = rule.execute(&flight_payload());
        let wire = execute_rule(&discount_rule(), &flight_payload());
        assert_eq!(wire, typed);

        let policy: Rule = serde_json::from_value(serde_json::json! {{
            "conditions": [
                {"attribute": "is_cheapest_direct", "operator": "==", "value": false}
            ]
        }})
        .unwrap();
        let verdict = policy.check_policy(&serde_json::json!({"is_cheapest_direct": false}));
        assert!(!verdict.in_policy);
    }
}
