//! Schema evaluation. Every field, item and invariant is checked
//! independently; nothing stops at the first violation.

use chrono::DateTime;
use serde_json::{Map, Value};

use super::violation::{Format, ValueType, Violation, ViolationKind};
use crate::path::Path;
use crate::schema::choice;
use crate::schema::{
    ArrayRule, Invariant, NumberRule, ObjectSchema, Presence, Rule, StringFormat, StringRule,
};

#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn check(&mut self, value: &Value, rule: &Rule, path: &Path) {
        match rule {
            Rule::Any => {}
            Rule::String(rule) => self.check_string(value, rule, path),
            Rule::Number(rule) => self.check_number(value, rule, path),
            Rule::Boolean => {
                if !value.is_boolean() {
                    self.push(path.clone(), ViolationKind::InvalidType(ValueType::Boolean));
                }
            }
            Rule::Timestamp => {
                if !is_timestamp(value) {
                    self.push(path.clone(), ViolationKind::InvalidFormat(Format::Timestamp));
                }
            }
            Rule::Array(rule) => self.check_array(value, rule, path),
            Rule::Ordered { items, min_items } => self.check_ordered(value, items, *min_items, path),
            Rule::Object(schema) => self.check_object(value, schema, path),
            Rule::ChoiceRule => self.check_object(value, &choice::rule_schema(None), path),
        }
    }

    pub fn check_object(&mut self, value: &Value, schema: &ObjectSchema, path: &Path) {
        let Some(map) = value.as_object() else {
            self.push(path.clone(), ViolationKind::InvalidType(ValueType::Object));
            return;
        };

        for field in &schema.fields {
            let child = path.join(&*field.name);
            match (field.presence, map.get(&*field.name)) {
                (Presence::Required, None) => self.push(child, ViolationKind::Required),
                (Presence::Forbidden, Some(_)) => self.push(child, ViolationKind::NotAllowed),
                (_, Some(v)) => self.check(v, &field.rule, &child),
                (_, None) => {}
            }
        }

        for key in map.keys() {
            if !schema.declares(key) {
                self.push(path.join(key.as_str()), ViolationKind::NotAllowed);
            }
        }

        for invariant in &schema.invariants {
            self.check_invariant(map, invariant, path);
        }
    }

    fn check_invariant(&mut self, map: &Map<String, Value>, invariant: &Invariant, path: &Path) {
        match invariant {
            Invariant::MutuallyExclusive { key, peers } => {
                if !map.contains_key(*key) {
                    return;
                }
                if let Some(peer) = peers.iter().find(|p| map.contains_key(**p)) {
                    self.push(
                        path.join(*key),
                        ViolationKind::Conflict {
                            peer: peer.to_string(),
                        },
                    );
                }
            }
            Invariant::ExactlyOneOf(peers) => {
                let present = present_keys(map, peers);
                if present.len() > 1 {
                    self.push(path.clone(), ViolationKind::ExclusivePeers(present));
                } else if present.is_empty() {
                    self.push(path.clone(), ViolationKind::MissingPeers(owned(peers)));
                }
            }
            Invariant::AtLeastOneOf(peers) => {
                if present_keys(map, peers).is_empty() {
                    self.push(path.clone(), ViolationKind::MissingPeers(owned(peers)));
                }
            }
            Invariant::Keyed {
                key,
                present,
                absent,
            } => {
                let branch = if map.contains_key(*key) { present } else { absent };
                self.check_invariant(map, branch, path);
            }
        }
    }

    fn check_string(&mut self, value: &Value, rule: &StringRule, path: &Path) {
        if let Some(allowed) = &rule.one_of {
            let matches = value
                .as_str()
                .is_some_and(|s| allowed.iter().any(|a| a == s));
            if !matches {
                self.push(path.clone(), ViolationKind::NotOneOf(allowed.clone()));
            }
            return;
        }

        let Some(s) = value.as_str() else {
            self.push(path.clone(), ViolationKind::InvalidType(ValueType::String));
            return;
        };
        if s.is_empty() {
            self.push(path.clone(), ViolationKind::Empty);
            return;
        }
        if rule.format == StringFormat::Uri && url::Url::parse(s).is_err() {
            self.push(path.clone(), ViolationKind::InvalidFormat(Format::Uri));
        }
    }

    fn check_number(&mut self, value: &Value, rule: &NumberRule, path: &Path) {
        let Some(n) = value.as_f64() else {
            self.push(path.clone(), ViolationKind::InvalidType(ValueType::Number));
            return;
        };
        if rule.integer && n.fract() != 0.0 {
            self.push(path.clone(), ViolationKind::InvalidType(ValueType::Integer));
        }
        if let Some(min) = rule.min {
            if n < min {
                self.push(path.clone(), ViolationKind::BelowMinimum(min));
            }
        }
        if let Some(max) = rule.max {
            if n > max {
                self.push(path.clone(), ViolationKind::AboveMaximum(max));
            }
        }
    }

    fn check_array(&mut self, value: &Value, rule: &ArrayRule, path: &Path) {
        let Some(items) = value.as_array() else {
            self.push(path.clone(), ViolationKind::InvalidType(ValueType::Array));
            return;
        };
        if let Some(item_rule) = &rule.items {
            for (i, item) in items.iter().enumerate() {
                self.check(item, item_rule, &path.join(i));
            }
        }
        if items.len() < rule.min_items {
            self.push(path.clone(), ViolationKind::TooFewItems(rule.min_items));
        }
    }

    fn check_ordered(&mut self, value: &Value, rules: &[Rule], min_items: usize, path: &Path) {
        let Some(items) = value.as_array() else {
            self.push(path.clone(), ViolationKind::InvalidType(ValueType::Array));
            return;
        };
        for (i, (item, rule)) in items.iter().zip(rules).enumerate() {
            self.check(item, rule, &path.join(i));
        }
        if items.len() < min_items {
            self.push(path.clone(), ViolationKind::TooFewItems(min_items));
        }
    }

    fn push(&mut self, path: Path, kind: ViolationKind) {
        self.violations.push(Violation::new(path, kind));
    }
}

fn present_keys(map: &Map<String, Value>, peers: &[&'static str]) -> Vec<String> {
    peers
        .iter()
        .filter(|p| map.contains_key(**p))
        .map(|p| p.to_string())
        .collect()
}

fn owned(peers: &[&'static str]) -> Vec<String> {
    peers.iter().map(|p| p.to_string()).collect()
}

/// Milliseconds since the epoch (as a number or numeric string) or an
/// RFC 3339 date-time.
fn is_timestamp(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty()
                && (s.parse::<f64>().is_ok_and(f64::is_finite)
                    || DateTime::parse_from_rfc3339(s).is_ok())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use serde_json::json;

    fn run(value: &Value, schema: &ObjectSchema) -> Vec<String> {
        let mut validator = Validator::new();
        validator.check_object(value, schema, &Path::root());
        validator
            .into_violations()
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn fields_then_unknown_keys_then_invariants() {
        let schema = ObjectSchema::new()
            .field(Field::required("A", Rule::string()))
            .field(Field::optional("B", Rule::string()))
            .field(Field::optional("C", Rule::string()))
            .invariant(Invariant::MutuallyExclusive {
                key: "B",
                peers: vec!["C"],
            });
        let messages = run(&json!({"Z": 1, "B": "x", "C": ""}), &schema);
        assert_eq!(
            messages,
            vec![
                "\"A\" is required",
                "\"C\" is not allowed to be empty",
                "\"Z\" is not allowed",
                "\"B\" conflict with forbidden peer \"C\"",
            ]
        );
    }

    #[test]
    fn integer_rules_report_each_failure() {
        let schema = ObjectSchema::new()
            .field(Field::optional("N", Rule::integer(Some(1.0), Some(10.0))));
        assert_eq!(
            run(&json!({"N": 0.5}), &schema),
            vec![
                "\"N\" must be an integer",
                "\"N\" must be larger than or equal to 1",
            ]
        );
        assert_eq!(
            run(&json!({"N": 11}), &schema),
            vec!["\"N\" must be less than or equal to 10"]
        );
        assert_eq!(run(&json!({"N": "3"}), &schema), vec!["\"N\" must be a number"]);
        assert!(run(&json!({"N": 2.0}), &schema).is_empty());
    }

    #[test]
    fn one_of_checks_membership_only() {
        let schema = ObjectSchema::new().field(Field::required("S", Rule::one_of(["a", "b"])));
        assert_eq!(run(&json!({"S": 3}), &schema), vec!["\"S\" must be one of [a, b]"]);
        assert!(run(&json!({"S": "b"}), &schema).is_empty());
        let empty = ObjectSchema::new().field(Field::required("S", Rule::one_of(Vec::<String>::new())));
        assert_eq!(run(&json!({"S": "a"}), &empty), vec!["\"S\" must be one of []"]);
    }

    #[test]
    fn array_items_are_addressed_by_index() {
        let schema = ObjectSchema::new().field(Field::required("L", Rule::array(Rule::string(), 1)));
        let mut validator = Validator::new();
        validator.check_object(&json!({"L": ["ok", 4]}), &schema, &Path::root());
        let violations = validator.into_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.to_string(), "L.1");
        assert_eq!(violations[0].message, "\"1\" must be a string");

        assert_eq!(
            run(&json!({"L": []}), &schema),
            vec!["\"L\" must contain at least 1 items"]
        );
    }

    #[test]
    fn exactly_one_of_reports_present_or_all_peers() {
        let schema = ObjectSchema::new()
            .field(Field::optional("X", Rule::Any))
            .field(Field::optional("Y", Rule::Any))
            .invariant(Invariant::ExactlyOneOf(vec!["X", "Y"]));
        assert_eq!(
            run(&json!({"X": 1, "Y": 2}), &schema),
            vec!["\"value\" contains a conflict between exclusive peers [X, Y]"]
        );
        assert_eq!(
            run(&json!({}), &schema),
            vec!["\"value\" must contain at least one of [X, Y]"]
        );
        assert!(run(&json!({"Y": 2}), &schema).is_empty());
    }

    #[test]
    fn keyed_invariant_picks_branch_by_key() {
        let schema = ObjectSchema::new()
            .field(Field::optional("K", Rule::Any))
            .field(Field::optional("X", Rule::Any))
            .field(Field::optional("Y", Rule::Any))
            .invariant(Invariant::Keyed {
                key: "K",
                present: Box::new(Invariant::ExactlyOneOf(vec!["X"])),
                absent: Box::new(Invariant::ExactlyOneOf(vec!["X", "Y"])),
            });
        assert_eq!(
            run(&json!({"K": 1, "Y": 2}), &schema),
            vec!["\"value\" must contain at least one of [X]"]
        );
        assert!(run(&json!({"Y": 2}), &schema).is_empty());
        assert!(run(&json!({"K": 1, "X": 2}), &schema).is_empty());
    }

    #[test]
    fn uri_and_timestamp_formats() {
        let schema = ObjectSchema::new()
            .field(Field::optional("U", Rule::uri()))
            .field(Field::optional("T", Rule::Timestamp));
        assert!(run(&json!({"U": "arn:aws:lambda:us-east-1:1:function:f", "T": "2016-03-14T01:59:00Z"}), &schema).is_empty());
        assert!(run(&json!({"T": 1457920740000u64}), &schema).is_empty());
        assert_eq!(
            run(&json!({"U": "not a uri", "T": "Tuesday"}), &schema),
            vec![
                "\"U\" must be a valid uri",
                "\"T\" must be a valid timestamp or number of milliseconds",
            ]
        );
    }

    #[test]
    fn nested_choice_rules_expand_lazily() {
        let schema = ObjectSchema::new().field(Field::required("Not", Rule::ChoiceRule));
        let deep = json!({"Not": {"Not": {"Not": {"Variable": "$.x", "Next": "A"}}}});
        let mut validator = Validator::new();
        validator.check_object(&deep, &schema, &Path::root());
        let violations = validator.into_violations();
        let rendered: Vec<String> = violations.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(rendered, vec!["Not.Not.Not.Next", "Not.Not.Not"]);
        assert_eq!(violations[0].message, "\"Next\" is not allowed");
    }
}
