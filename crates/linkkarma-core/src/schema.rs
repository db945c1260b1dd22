//! Declarative shape checks for repaired model output.
//!
//! Validation runs on the raw [`serde_json::Value`] before typed
//! deserialization so that a failure names the offending field and the rule
//! it broke instead of surfacing a generic serde message.

use serde_json::Value;

use crate::repair::ParseError;

/// List length constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Any,
    Exactly(usize),
    AtLeast(usize),
}

impl Length {
    fn check(&self, got: usize) -> Result<(), String> {
        match *self {
            Self::Any => Ok(()),
            Self::Exactly(n) if got != n => Err(format!("expected exactly {n} items, got {got}")),
            Self::AtLeast(n) if got < n => Err(format!("expected at least {n} items, got {got}")),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// A string; `non_empty` rejects blank strings.
    Text { non_empty: bool },
    Number,
    /// A string from a closed set (compared case-insensitively).
    OneOf(&'static [&'static str]),
    TextList(Length),
    /// A list of objects each carrying the given string keys.
    ObjectList {
        len: Length,
        keys: &'static [&'static str],
    },
    /// An object whose keys carry their own rules. A `null` value inside it
    /// is checked against the key's rule rather than treated as absent.
    Fields(&'static [Field]),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub rule: Rule,
}

const fn required(name: &'static str, rule: Rule) -> Field {
    Field {
        name,
        required: true,
        rule,
    }
}

const fn optional(name: &'static str, rule: Rule) -> Field {
    Field {
        name,
        required: false,
        rule,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// Contract for generated showcase copy.
pub const CONTENT_SCHEMA: Schema = Schema {
    name: "showcase content",
    fields: &[
        required("title", Rule::Text { non_empty: true }),
        required("short_description", Rule::Text { non_empty: true }),
        optional("service_name", Rule::Text { non_empty: false }),
        required("what_is", Rule::Text { non_empty: true }),
        required("advantages", Rule::TextList(Length::Exactly(3))),
        required("steps", Rule::TextList(Length::AtLeast(3))),
        required(
            "faq",
            Rule::ObjectList {
                len: Length::AtLeast(2),
                keys: &["question", "answer"],
            },
        ),
    ],
};

/// Contract for a reputation verdict.
pub const SECURITY_SCHEMA: Schema = Schema {
    name: "security verdict",
    fields: &[
        required("status", Rule::OneOf(&["APROVADO", "SUSPEITO", "BLOQUEADO"])),
        required("confidence", Rule::Number),
        required("sources_checked", Rule::TextList(Length::Any)),
        required("findings", Rule::TextList(Length::Any)),
        required("recommendation", Rule::Text { non_empty: false }),
        optional("details", Rule::Fields(DETAILS_FIELDS)),
    ],
};

const DETAILS_FIELDS: &[Field] = &[
    optional("positive_mentions", Rule::Number),
    optional("negative_mentions", Rule::Number),
    optional("scam_indicators", Rule::TextList(Length::Any)),
    optional("trustworthiness_score", Rule::Number),
];

impl Schema {
    pub fn validate(&self, value: &Value) -> Result<(), ParseError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ParseError::validation("$", format!("{} must be a JSON object", self.name)))?;

        for field in self.fields {
            match obj.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ParseError::validation(field.name, "required field is missing"));
                }
                None | Some(Value::Null) => {}
                Some(v) => check_rule(field.name, &field.rule, v)?,
            }
        }
        Ok(())
    }
}

fn check_nested(name: &str, fields: &[Field], value: &Value) -> Result<(), ParseError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ParseError::validation(name, "expected an object"))?;
    for field in fields {
        let path = format!("{name}.{}", field.name);
        match obj.get(field.name) {
            None if field.required => {
                return Err(ParseError::validation(path, "required field is missing"));
            }
            None => {}
            Some(v) => check_rule(&path, &field.rule, v)?,
        }
    }
    Ok(())
}

fn check_rule(name: &str, rule: &Rule, value: &Value) -> Result<(), ParseError> {
    match rule {
        Rule::Text { non_empty } => {
            let s = value
                .as_str()
                .ok_or_else(|| ParseError::validation(name, "expected a string"))?;
            if *non_empty && s.trim().is_empty() {
                return Err(ParseError::validation(name, "must not be empty"));
            }
        }
        Rule::Number => {
            if !value.is_number() {
                return Err(ParseError::validation(name, "expected a number"));
            }
        }
        Rule::OneOf(allowed) => {
            let s = value
                .as_str()
                .ok_or_else(|| ParseError::validation(name, "expected a string"))?;
            if !allowed.iter().any(|a| a.eq_ignore_ascii_case(s.trim())) {
                return Err(ParseError::validation(
                    name,
                    format!("expected one of {}, got {s:?}", allowed.join("|")),
                ));
            }
        }
        Rule::TextList(len) => {
            let items = value
                .as_array()
                .ok_or_else(|| ParseError::validation(name, "expected an array"))?;
            len.check(items.len())
                .map_err(|rule| ParseError::validation(name, rule))?;
            if let Some(i) = items.iter().position(|v| !v.is_string()) {
                return Err(ParseError::validation(
                    format!("{name}[{i}]"),
                    "expected a string",
                ));
            }
        }
        Rule::ObjectList { len, keys } => {
            let items = value
                .as_array()
                .ok_or_else(|| ParseError::validation(name, "expected an array"))?;
            len.check(items.len())
                .map_err(|rule| ParseError::validation(name, rule))?;
            for (i, item) in items.iter().enumerate() {
                for key in *keys {
                    if !item.get(*key).is_some_and(Value::is_string) {
                        return Err(ParseError::validation(
                            format!("{name}[{i}].{key}"),
                            "expected a string",
                        ));
                    }
                }
            }
        }
        Rule::Fields(fields) => check_nested(name, fields, value)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content() -> Value {
        json!({
            "title": "Ganhe R$ 20 no Inter",
            "short_description": "Conta digital gratuita",
            "service_name": "Inter",
            "what_is": "Banco digital completo",
            "advantages": ["Sem tarifas", "Cashback", "Investimentos"],
            "steps": ["Baixe o app", "Use o convite", "Abra a conta"],
            "faq": [
                {"question": "É grátis?", "answer": "Sim"},
                {"question": "Tem cartão?", "answer": "Sim"}
            ]
        })
    }

    fn assert_field(result: Result<(), ParseError>, expected: &str) {
        match result {
            Err(ParseError::Validation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected validation error on {expected}, got {other:?}"),
        }
    }

    #[test]
    fn valid_content_passes() {
        CONTENT_SCHEMA.validate(&content()).unwrap();
    }

    #[test]
    fn advantages_must_be_exactly_three() {
        let mut v = content();
        v["advantages"] = json!(["a", "b"]);
        let err = CONTENT_SCHEMA.validate(&v).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid field `advantages`: expected exactly 3 items, got 2"
        );

        v["advantages"] = json!(["a", "b", "c", "d"]);
        assert_field(CONTENT_SCHEMA.validate(&v), "advantages");
    }

    #[test]
    fn steps_need_at_least_three() {
        let mut v = content();
        v["steps"] = json!(["a", "b"]);
        assert_field(CONTENT_SCHEMA.validate(&v), "steps");

        v["steps"] = json!(["a", "b", "c", "d", "e"]);
        CONTENT_SCHEMA.validate(&v).unwrap();
    }

    #[test]
    fn faq_needs_two_complete_entries() {
        let mut v = content();
        v["faq"] = json!([{"question": "q", "answer": "a"}]);
        assert_field(CONTENT_SCHEMA.validate(&v), "faq");

        v["faq"] = json!([{"question": "q", "answer": "a"}, {"question": "q2"}]);
        assert_field(CONTENT_SCHEMA.validate(&v), "faq[1].answer");
    }

    #[test]
    fn missing_and_blank_fields() {
        let mut v = content();
        v.as_object_mut().unwrap().remove("what_is");
        assert_field(CONTENT_SCHEMA.validate(&v), "what_is");

        let mut v = content();
        v["title"] = json!("   ");
        assert_field(CONTENT_SCHEMA.validate(&v), "title");

        let mut v = content();
        v["service_name"] = json!(null);
        CONTENT_SCHEMA.validate(&v).unwrap();
    }

    #[test]
    fn non_string_list_item() {
        let mut v = content();
        v["steps"] = json!(["a", 2, "c"]);
        assert_field(CONTENT_SCHEMA.validate(&v), "steps[1]");
    }

    #[test]
    fn root_must_be_object() {
        assert_field(CONTENT_SCHEMA.validate(&json!([1, 2])), "$");
    }

    #[test]
    fn security_status_closed_set() {
        let mut v = json!({
            "status": "aprovado",
            "confidence": 88,
            "sources_checked": ["Reclame Aqui"],
            "findings": [],
            "recommendation": "Pode usar"
        });
        SECURITY_SCHEMA.validate(&v).unwrap();

        v["status"] = json!("SEGURO");
        assert_field(SECURITY_SCHEMA.validate(&v), "status");
    }

    #[test]
    fn security_confidence_must_be_number() {
        let v = json!({
            "status": "SUSPEITO",
            "confidence": "alta",
            "sources_checked": [],
            "findings": [],
            "recommendation": ""
        });
        assert_field(SECURITY_SCHEMA.validate(&v), "confidence");
    }

    #[test]
    fn details_fields_are_named() {
        let mut v = json!({
            "status": "SUSPEITO",
            "confidence": 60,
            "sources_checked": [],
            "findings": [],
            "recommendation": "",
            "details": {"positive_mentions": 3, "scam_indicators": ["pix antecipado"]}
        });
        SECURITY_SCHEMA.validate(&v).unwrap();

        v["details"]["scam_indicators"] = json!(null);
        assert_field(SECURITY_SCHEMA.validate(&v), "details.scam_indicators");

        v["details"] = json!({"negative_mentions": "muitas"});
        assert_field(SECURITY_SCHEMA.validate(&v), "details.negative_mentions");

        v["details"] = json!({"scam_indicators": ["ok", 7]});
        assert_field(SECURITY_SCHEMA.validate(&v), "details.scam_indicators[1]");

        v["details"] = json!("nenhum");
        assert_field(SECURITY_SCHEMA.validate(&v), "details");
    }
}
