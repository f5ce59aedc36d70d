//! Sample payloads, example rules, and seeded test-data generation.
//!
//! The catalog here backs the demo binaries and tests: a canonical booking payload,
//! a few executable example rules, and deterministic generation of synthetic rules
//! and payloads in the shapes the template catalog describes. Generation is seeded,
//! so a corpus is reproducible from its seed.

use guacamole::combinators::*;
use guacamole::Guacamole;
use serde_json::{Map, Value};

use crate::templates::{RuleTemplate, TEMPLATES};
use crate::{Action, ActionName, Condition, Operator, Rule};

/////////////////////////////////////////// Value Pools ////////////////////////////////////////////

/// Product types a booking payload can carry.
pub const PRODUCT_TYPES: &[&str] = &["flight", "hotel", "car", "package", "insurance", "visa"];

/// Fare classes for flight products.
pub const FARE_CLASSES: &[&str] = &["economy", "premium", "business", "first"];

/// Room types for hotel products.
pub const ROOM_TYPES: &[&str] = &["standard", "deluxe", "suite"];

/// Loyalty tiers.
pub const LOYALTY_TIERS: &[&str] = &["none", "silver", "gold", "platinum"];

/// Booking channels.
pub const CHANNELS: &[&str] = &["online", "app", "agent", "retail"];

/// Accepted kinds of price-match proof.
pub const PRICE_MATCH_PROOFS: &[&str] = &["none", "url", "screenshot", "invoice"];

/// Promo eligibility flags.
pub const PROMO_FLAGS: &[&str] = &["first_booking", "student", "military"];

const BOOKING_WINDOWS: &[u64] = &[0, 3, 7, 14, 30, 60];
const STAY_LENGTHS: &[u64] = &[1, 2, 3, 4, 7, 14];
const BOOKING_AGES_HOURS: &[u64] = &[12, 24, 48];
const PAX_COUNTS: &[u64] = &[1, 2, 4, 6, 10];
const MARKUP_CAPS: &[u64] = &[3, 5, 8, 12];
const DISCOUNT_PCTS: &[u64] = &[5, 8, 10, 12, 15];
const PENALTY_PCTS: &[u64] = &[25, 50, 100];
const COMMISSION_PCTS: &[u64] = &[5, 7, 10];
const OVERRIDE_PCTS: &[u64] = &[3, 5, 7];
const BLACKOUT_DATES: &[&str] = &["2025-12-24", "2025-12-31"];

////////////////////////////////////////////// Samples /////////////////////////////////////////////

/// A canonical booking payload exercising the attributes the example rules use.
pub fn sample_payload() -> Map<String, Value> {
    let payload = serde_json::json! {{
        "product_type": "flight",
        "price": 200.0,
        "competitor_price": 180.0,
        "booking_window_days": 30,
        "loyalty_tier": "gold",
        "customer_country": "IN",
        "is_cheapest_direct": false,
        "flight_duration_hours": 3,
        "cabin_class": "economy",
        "manager_approval": false,
        "hotel_star_rating": 4,
        "direct_flight_available": true,
        "is_direct_flight": false
    }};
    match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// A small set of executable example rules matching [`sample_payload`].
pub fn example_rules() -> Vec<Rule> {
    let mut discount = Map::new();
    discount.insert("value".to_string(), Value::from(10));
    discount.insert("type".to_string(), Value::from("percent"));

    let mut loyalty_perk = Map::new();
    loyalty_perk.insert("field".to_string(), Value::from("perks.lounge_access"));
    loyalty_perk.insert("value".to_string(), Value::from(true));

    vec![
        Rule {
            rule_id: "example_booking_window".to_string(),
            name: "booking_window_discount".to_string(),
            conditions: vec![
                Condition::new("product_type", Operator::Equal, Value::from("flight")),
                Condition::new(
                    "booking_window_days",
                    Operator::GreaterThanOrEqual,
                    Value::from(30),
                ),
            ],
            actions: vec![Action::new(ActionName::ApplyDiscount, discount)],
            priority: 1,
            meta: Map::new(),
        },
        Rule {
            rule_id: "example_loyalty_perk".to_string(),
            name: "loyalty_perk".to_string(),
            conditions: vec![Condition::new(
                "loyalty_tier",
                Operator::In,
                serde_json::json!(["gold", "platinum"]),
            )],
            actions: vec![Action::new(ActionName::SetField, loyalty_perk)],
            priority: 2,
            meta: Map::new(),
        },
        Rule {
            rule_id: "example_cheapest_direct".to_string(),
            name: "cheapest_direct_policy".to_string(),
            conditions: vec![Condition::new(
                "is_cheapest_direct",
                Operator::Equal,
                Value::from(false),
            )],
            actions: vec![Action::new(ActionName::MarkOutOfPolicy, Map::new())],
            priority: 10,
            meta: Map::new(),
        },
    ]
}

//////////////////////////////////////////// Generation ////////////////////////////////////////////

/// Generate one synthetic condition on `attribute`.
///
/// Attributes with known value pools or threshold semantics get realistic operators
/// and values; anything else becomes an `is_not_null` presence check.
pub fn generate_condition(guac: &mut Guacamole, attribute: &str) -> Condition {
    match attribute {
        "product_type" => pick_string(guac, attribute, PRODUCT_TYPES),
        "fare_class" => pick_string(guac, attribute, FARE_CLASSES),
        "room_type" => pick_string(guac, attribute, ROOM_TYPES),
        "loyalty_tier" => pick_string(guac, attribute, LOYALTY_TIERS),
        "channel" => pick_string(guac, attribute, CHANNELS),
        "price_match_proof" => pick_string(guac, attribute, PRICE_MATCH_PROOFS),
        "promo_eligibility_flags" => pick_string(guac, attribute, PROMO_FLAGS),
        "bundle_flag" => Condition::new(attribute, Operator::Equal, Value::from(coin()(guac))),
        "refundable_flag" => pick_string(guac, attribute, &["refundable", "non-refundable"]),
        "booking_window_days" => threshold(guac, attribute, Operator::GreaterThanOrEqual, BOOKING_WINDOWS),
        "length_of_stay_days" => threshold(guac, attribute, Operator::GreaterThanOrEqual, STAY_LENGTHS),
        "pax_count" => threshold(guac, attribute, Operator::GreaterThanOrEqual, PAX_COUNTS),
        "time_since_booking_hours" => threshold(guac, attribute, Operator::LessThanOrEqual, BOOKING_AGES_HOURS),
        "supplier_markup_pct" => threshold(guac, attribute, Operator::LessThan, MARKUP_CAPS),
        "travel_date" | "blackout_dates" => Condition::new(
            attribute,
            Operator::In,
            Value::from(
                BLACKOUT_DATES
                    .iter()
                    .map(|date| Value::from(*date))
                    .collect::<Vec<_>>(),
            ),
        ),
        _ => Condition::new(attribute, Operator::IsNotNull, Value::Null),
    }
}

fn pick_string(guac: &mut Guacamole, attribute: &str, pool: &[&str]) -> Condition {
    let value = select(range_to(pool.len()), pool)(guac);
    Condition::new(attribute, Operator::Equal, Value::from(value))
}

fn threshold(
    guac: &mut Guacamole,
    attribute: &str,
    operator: Operator,
    pool: &[u64],
) -> Condition {
    let value = select(range_to(pool.len()), pool)(guac);
    Condition::new(attribute, operator, Value::from(value))
}

fn pick_u64(guac: &mut Guacamole, pool: &[u64]) -> u64 {
    select(range_to(pool.len()), pool)(guac)
}

/// Generate one synthetic rule from the template catalog.
///
/// `index` becomes the rule id (`R00001`, ...). Actions outside the executor's
/// supported set are generated on purpose: they exercise the unknown-action path
/// downstream consumers have to survive.
pub fn generate_rule(guac: &mut Guacamole, index: usize) -> Rule {
    let template: RuleTemplate = select(range_to(TEMPLATES.len()), TEMPLATES)(guac);
    let conditions = template
        .condition_attributes
        .iter()
        .map(|attribute| generate_condition(guac, attribute))
        .collect();
    let mut meta = Map::new();
    meta.insert("source".to_string(), Value::from("synthetic"));
    meta.insert("template_id".to_string(), Value::from(template.id));
    Rule {
        rule_id: format!("R{index:05}"),
        name: template.name.to_string(),
        conditions,
        actions: vec![Action::new(
            ActionName::from_name(template.action),
            action_params(guac, template.action),
        )],
        priority: (range_to(50u64)(guac) + 1) as i64,
        meta,
    }
}

fn action_params(guac: &mut Guacamole, action: &str) -> Map<String, Value> {
    let mut params = Map::new();
    match action {
        "apply_discount" => {
            params.insert("type".to_string(), Value::from("percent"));
            params.insert("value".to_string(), Value::from(pick_u64(guac, DISCOUNT_PCTS)));
        }
        "match_price" => {
            params.insert("source".to_string(), Value::from("competitor_price"));
        }
        "add_service" => {
            params.insert("service".to_string(), Value::from("breakfast"));
            params.insert("charge".to_string(), Value::from(0));
        }
        "set_cancellation_penalty" => {
            params.insert("type".to_string(), Value::from("percent"));
            params.insert("value".to_string(), Value::from(pick_u64(guac, PENALTY_PCTS)));
        }
        "set_commission" => {
            params.insert("type".to_string(), Value::from("percent"));
            params.insert("value".to_string(), Value::from(pick_u64(guac, COMMISSION_PCTS)));
        }
        "allow_manual_override" => {
            params.insert(
                "max_override_percent".to_string(),
                Value::from(pick_u64(guac, OVERRIDE_PCTS)),
            );
        }
        "require_insurance" => {
            params.insert("level".to_string(), Value::from("standard"));
        }
        "require_doc" => {
            params.insert("doc".to_string(), Value::from("visa_application"));
            params.insert("service".to_string(), Value::from("visa"));
        }
        "apply_markup" => {
            params.insert("type".to_string(), Value::from("percent"));
            params.insert("value".to_string(), Value::from(pick_u64(guac, DISCOUNT_PCTS)));
        }
        "block_promo" => {
            params.insert("reason".to_string(), Value::from("blackout"));
        }
        _ => {}
    }
    params
}

/// Generate one synthetic booking payload.
pub fn generate_payload(guac: &mut Guacamole) -> Map<String, Value> {
    let mut payload = Map::new();
    let product = select(range_to(PRODUCT_TYPES.len()), PRODUCT_TYPES)(guac);
    payload.insert("product_type".to_string(), Value::from(product));
    let cents = range_to(100_000u64)(guac);
    payload.insert("price".to_string(), Value::from(cents as f64 / 100.0));
    payload.insert(
        "booking_window_days".to_string(),
        Value::from(pick_u64(guac, BOOKING_WINDOWS)),
    );
    payload.insert(
        "length_of_stay_days".to_string(),
        Value::from(pick_u64(guac, STAY_LENGTHS)),
    );
    payload.insert(
        "pax_count".to_string(),
        Value::from(pick_u64(guac, PAX_COUNTS)),
    );
    payload.insert(
        "loyalty_tier".to_string(),
        Value::from(select(range_to(LOYALTY_TIERS.len()), LOYALTY_TIERS)(guac)),
    );
    payload.insert(
        "fare_class".to_string(),
        Value::from(select(range_to(FARE_CLASSES.len()), FARE_CLASSES)(guac)),
    );
    payload.insert(
        "channel".to_string(),
        Value::from(select(range_to(CHANNELS.len()), CHANNELS)(guac)),
    );
    payload.insert("bundle_flag".to_string(), Value::from(coin()(guac)));
    payload.insert("is_cheapest_direct".to_string(), Value::from(coin()(guac)));
    payload.insert(
        "refundable_flag".to_string(),
        Value::from(if coin()(guac) {
            "refundable"
        } else {
            "non-refundable"
        }),
    );
    payload
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{execute_rule, Reason};

    #[test]
    fn sample_payload_has_the_canonical_fields() {
        let payload = sample_payload();
        assert_eq!(serde_json::json!("flight"), payload["product_type"]);
        assert_eq!(serde_json::json!(200.0), payload["price"]);
        assert_eq!(serde_json::json!(false), payload["is_cheapest_direct"]);
    }

    #[test]
    fn example_rules_execute_against_the_sample_payload() {
        let payload = Value::Object(sample_payload());
        for rule in example_rules() {
            let result = rule.execute(&payload);
            assert!(result.matched, "{}", rule.rule_id);
            assert_eq!(Reason::ActionsExecuted, result.reason);
        }
    }

    #[test]
    fn example_policy_rule_marks_out_of_policy() {
        let payload = Value::Object(sample_payload());
        let policy = example_rules()
            .into_iter()
            .find(|rule| rule.name == "cheapest_direct_policy")
            .unwrap();
        let result = policy.execute(&payload);
        assert!(!result.in_policy);
        assert!(!policy.check_policy(&payload).in_policy);
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let mut guac = Guacamole::new(7);
        let first: Vec<Rule> = (0..16).map(|i| generate_rule(&mut guac, i + 1)).collect();
        let mut guac = Guacamole::new(7);
        let second: Vec<Rule> = (0..16).map(|i| generate_rule(&mut guac, i + 1)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn generated_rules_are_well_formed_and_executable() {
        let mut guac = Guacamole::new(0);
        for index in 0..64 {
            let rule = generate_rule(&mut guac, index + 1);
            assert_eq!(format!("R{:05}", index + 1), rule.rule_id);
            assert!(!rule.conditions.is_empty());
            assert_eq!(1, rule.actions.len());
            assert!(rule.priority >= 1 && rule.priority <= 50);
            let wire = serde_json::to_value(&rule).unwrap();
            let payload = Value::Object(generate_payload(&mut guac));
            let result = execute_rule(&wire, &payload);
            assert_ne!(Reason::InvalidRule, result.reason);
        }
    }

    #[test]
    fn generated_conditions_use_threshold_operators() {
        let mut guac = Guacamole::new(1);
        let condition = generate_condition(&mut guac, "booking_window_days");
        assert_eq!(Operator::GreaterThanOrEqual, condition.operator);
        let condition = generate_condition(&mut guac, "time_since_booking_hours");
        assert_eq!(Operator::LessThanOrEqual, condition.operator);
        let condition = generate_condition(&mut guac, "an_attribute_without_a_pool");
        assert_eq!(Operator::IsNotNull, condition.operator);
    }
}
