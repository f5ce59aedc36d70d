//! Rule templates and slot-driven rule synthesis.
//!
//! The NL front-end (out of scope for this crate) reduces a policy sentence to an
//! intent name plus structured slot values. This module holds the template catalog
//! those intents map onto and builds executable [`Rule`]s from slot values.

use serde_json::{Map, Value};

use crate::{Action, ActionName, Condition, Operator, Rule};

/// A named rule shape: which attributes it conditions on and which action it takes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RuleTemplate {
    /// Short template identifier (`"t1"` through `"t20"`).
    pub id: &'static str,
    /// Template name; doubles as the intent name produced by the NL front-end.
    pub name: &'static str,
    /// The payload attributes this template conditions on.
    pub condition_attributes: &'static [&'static str],
    /// The action a rule built from this template applies.
    pub action: &'static str,
}

/// The built-in template catalog.
pub const TEMPLATES: &[RuleTemplate] = &[
    RuleTemplate {
        id: "t1",
        name: "product_class_discount",
        condition_attributes: &["product_type", "fare_class"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t2",
        name: "booking_window_discount",
        condition_attributes: &["product_type", "booking_window_days"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t3",
        name: "loyalty_discount",
        condition_attributes: &["product_type", "loyalty_tier"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t4",
        name: "bundle_combo_discount",
        condition_attributes: &["itinerary_components", "bundle_flag"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t5",
        name: "price_match_policy",
        condition_attributes: &["price_match_proof", "time_since_booking_hours", "competitor_price"],
        action: "match_price",
    },
    RuleTemplate {
        id: "t6",
        name: "blackout_exclusion",
        condition_attributes: &["travel_date"],
        action: "block_promo",
    },
    RuleTemplate {
        id: "t7",
        name: "min_stay_perk",
        condition_attributes: &["length_of_stay_days"],
        action: "add_service",
    },
    RuleTemplate {
        id: "t8",
        name: "cancellation_policy",
        condition_attributes: &["refundable_flag", "booking_window_days"],
        action: "set_cancellation_penalty",
    },
    RuleTemplate {
        id: "t9",
        name: "supplier_commission_override",
        condition_attributes: &["supplier", "supplier_markup_pct"],
        action: "set_commission",
    },
    RuleTemplate {
        id: "t10",
        name: "promo_code_eligibility",
        condition_attributes: &["promo_code", "promo_eligibility_flags"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t11",
        name: "manual_override",
        condition_attributes: &["channel", "manual_override_allowed"],
        action: "allow_manual_override",
    },
    RuleTemplate {
        id: "t12",
        name: "insurance_requirement",
        condition_attributes: &["length_of_stay_days", "destination_country"],
        action: "require_insurance",
    },
    RuleTemplate {
        id: "t13",
        name: "payment_method_incentive",
        condition_attributes: &["payment_method"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t14",
        name: "group_booking_discount",
        condition_attributes: &["group_booking_flag", "pax_count"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t15",
        name: "child_infant_pricing",
        condition_attributes: &["customer_age_group"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t16",
        name: "seasonal_markup",
        condition_attributes: &["travel_season"],
        action: "apply_markup",
    },
    RuleTemplate {
        id: "t17",
        name: "tax_override",
        condition_attributes: &["product_type", "channel"],
        action: "set_tax_pct",
    },
    RuleTemplate {
        id: "t18",
        name: "promo_cap_precedence",
        condition_attributes: &["promo_eligibility_flags", "max_discount_allowed"],
        action: "apply_discount",
    },
    RuleTemplate {
        id: "t19",
        name: "blackout_min_stay_conflict",
        condition_attributes: &["blackout_dates", "length_of_stay_days"],
        action: "block_promo",
    },
    RuleTemplate {
        id: "t20",
        name: "require_docs_by_destination",
        condition_attributes: &["destination_country", "customer_country"],
        action: "require_doc",
    },
];

/// Look up a template by its id.
pub fn template_by_id(id: &str) -> Option<&'static RuleTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Look up a template by its name (the intent name).
pub fn template_by_name(name: &str) -> Option<&'static RuleTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// The operator a synthesized condition on `attribute` uses.
///
/// Window- and count-like attributes are thresholds; everything else is an equality
/// check on the extracted value.
pub fn default_operator(attribute: &str) -> Operator {
    match attribute {
        "booking_window_days" | "length_of_stay_days" | "pax_count" => {
            Operator::GreaterThanOrEqual
        }
        "time_since_booking_hours" => Operator::LessThanOrEqual,
        "supplier_markup_pct" => Operator::LessThan,
        _ => Operator::Equal,
    }
}

/// Build an executable rule from an intent name and extracted slot values.
///
/// Every slot except `discount_pct` becomes a condition using [`default_operator`];
/// a `discount_pct` slot becomes an `apply_discount` percent action. The rule gets a
/// fresh uuid `rule_id` and provenance metadata (`source = "slots"`, `created_at` in
/// unix seconds).
///
/// # Example
///
/// ```
/// use zenrules::templates::synthesize_rule;
///
/// let slots = serde_json::json! {{
///     "product_type": "flight",
///     "booking_window_days": 30,
///     "discount_pct": 10
/// }};
/// let rule = synthesize_rule("booking_window_discount", slots.as_object().unwrap());
/// assert_eq!(2, rule.conditions.len());
/// assert_eq!(1, rule.actions.len());
/// ```
pub fn synthesize_rule(intent: &str, slots: &Map<String, Value>) -> Rule {
    let mut conditions = vec![];
    let mut actions = vec![];
    for (attribute, value) in slots {
        if attribute == "discount_pct" {
            let mut params = Map::new();
            params.insert("value".to_string(), value.clone());
            params.insert("type".to_string(), Value::String("percent".to_string()));
            actions.push(Action::new(ActionName::ApplyDiscount, params));
            continue;
        }
        conditions.push(Condition::new(
            attribute.clone(),
            default_operator(attribute),
            value.clone(),
        ));
    }
    let mut meta = Map::new();
    meta.insert("source".to_string(), Value::String("slots".to_string()));
    meta.insert("created_at".to_string(), unix_seconds().into());
    Rule {
        rule_id: format!("rule_{}", uuid::Uuid::new_v4()),
        name: intent.to_string(),
        conditions,
        actions,
        priority: 1,
        meta,
    }
}

fn unix_seconds() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
