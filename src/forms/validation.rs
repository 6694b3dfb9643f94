//! Pure validation rules applied to a draft on every submit attempt.
//!
//! Rules run per field in a fixed order (required, email format, phone
//! format). A later failing rule replaces the message of an earlier one, so
//! each field reports at most one message.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{Draft, FieldDefinition, FieldType};

/// Name of the field that receives the ten-digit phone check.
pub const PHONE_FIELD: &str = "phone";

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email format";
pub const INVALID_PHONE_MESSAGE: &str = "Phone number must be 10 digits";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"));

/// Per-field validation failures for one draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorSet {
    errors: BTreeMap<String, String>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    fn set(&mut self, field: &str, message: String) {
        self.errors.insert(field.to_string(), message);
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Checks `draft` against every definition in `fields`.
pub fn validate(fields: &[FieldDefinition], draft: &Draft) -> ErrorSet {
    let mut errors = ErrorSet::new();

    for field in fields {
        let value = draft.get(&field.name);

        if field.required && value.is_empty() {
            errors.set(&field.name, format!("{} is required", field.label));
        }

        if field.field_type == FieldType::Email && !value.is_empty() && !is_valid_email(value) {
            errors.set(&field.name, INVALID_EMAIL_MESSAGE.to_string());
        }

        if field.name == PHONE_FIELD && !value.is_empty() && !is_valid_phone(value) {
            errors.set(&field.name, INVALID_PHONE_MESSAGE.to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::default_user_fields;

    fn email_field() -> Vec<FieldDefinition> {
        vec![FieldDefinition::new("email", "Email", FieldType::Email).required()]
    }

    fn draft(pairs: &[(&str, &str)]) -> Draft {
        pairs.iter().copied().collect()
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        let errors = validate(&email_field(), &draft(&[("email", "a@b")]));
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL_MESSAGE));
        assert_eq!(errors.len(), 1);

        let errors = validate(&email_field(), &draft(&[("email", "a@b.com")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn email_pattern_rejects_whitespace_and_extra_at() {
        for bad in ["a b@c.com", "a@@b.com", "a@b c.com", "@b.com", "a@.com", "a@b."] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
        for good in ["first.last@sub.example.org", "x@y.z", "a+tag@b.co"] {
            assert!(is_valid_email(good), "{good} should be accepted");
        }
    }

    #[test]
    fn required_message_uses_label() {
        let errors = validate(&default_user_fields(), &Draft::new());
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert!(!errors.has_error("phone"));
    }

    #[test]
    fn phone_must_be_exactly_ten_digits() {
        let fields = default_user_fields();
        let base = [("name", "Ada"), ("email", "ada@example.com")];

        let mut ok = base.to_vec();
        ok.push(("phone", "0123456789"));
        assert!(validate(&fields, &draft(&ok)).is_empty());

        for bad in ["123456789", "01234567890", "012345678x", "012 345 6789", "٠١٢٣٤٥٦٧٨٩"] {
            let mut pairs = base.to_vec();
            pairs.push(("phone", bad));
            let errors = validate(&fields, &draft(&pairs));
            assert_eq!(errors.get("phone"), Some(INVALID_PHONE_MESSAGE), "{bad}");
        }
    }

    #[test]
    fn phone_rule_keys_on_field_name_not_type() {
        let fields = vec![FieldDefinition::new("mobile", "Mobile", FieldType::Tel)];
        assert!(validate(&fields, &draft(&[("mobile", "abc")])).is_empty());
    }

    #[test]
    fn later_rule_overwrites_required_message() {
        // Fails both the email and the phone rule; phone runs last.
        let fields = vec![FieldDefinition::new("phone", "Phone", FieldType::Email).required()];
        let errors = validate(&fields, &draft(&[("phone", "not-an-email")]));
        assert_eq!(errors.get("phone"), Some(INVALID_PHONE_MESSAGE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn whitespace_counts_as_a_value() {
        let fields = vec![FieldDefinition::new("name", "Name", FieldType::Text).required()];
        assert!(validate(&fields, &draft(&[("name", " ")])).is_empty());
    }
}
