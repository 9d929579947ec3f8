//! Per-field validation rules.
//!
//! # Purpose
//! Each rule checks one constraint against the (possibly absent) value of
//! a field and produces a human-readable message on failure. Messages
//! mention the field's display label, not its identifier.
use crate::field::FieldValue;
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // Deliberately loose; the server is the authority on deliverability.
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

#[derive(Debug, Clone)]
pub enum Rule {
    /// Non-empty text, or a file when the field carries one.
    Required,
    /// Text must look like an email address.
    Email,
    /// Text must be at least this many characters.
    MinLen(usize),
    /// Text must match the pattern; the message is surfaced verbatim.
    Pattern { regex: Regex, message: String },
    /// A file must be attached.
    FileRequired,
    /// Attached file must not exceed this many bytes.
    FileMaxBytes(usize),
    /// Attached file's content type must be one of these.
    FileContentType(Vec<String>),
}

impl Rule {
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex: Regex::new(pattern).expect("valid field pattern"),
            message: message.into(),
        }
    }

    /// Check this rule against a field's value. `None` means the user has
    /// not entered anything yet.
    pub fn check(&self, label: &str, value: Option<&FieldValue>) -> Result<(), String> {
        match self {
            Rule::Required => match value {
                Some(FieldValue::Text(text)) if !text.trim().is_empty() => Ok(()),
                Some(FieldValue::File(_)) => Ok(()),
                _ => Err(format!("{label} is required")),
            },
            Rule::Email => match value {
                None => Ok(()),
                Some(FieldValue::Text(text)) if email_regex().is_match(text) => Ok(()),
                Some(_) => Err("Please enter a valid email address".to_string()),
            },
            Rule::MinLen(min) => match value {
                None => Ok(()),
                Some(FieldValue::Text(text)) if text.chars().count() >= *min => Ok(()),
                Some(_) => Err(format!("{label} must be at least {min} characters")),
            },
            Rule::Pattern { regex, message } => match value {
                None => Ok(()),
                Some(FieldValue::Text(text)) if regex.is_match(text) => Ok(()),
                Some(_) => Err(message.clone()),
            },
            Rule::FileRequired => match value {
                Some(FieldValue::File(_)) => Ok(()),
                _ => Err(format!("{label} is required")),
            },
            Rule::FileMaxBytes(max) => match value {
                Some(FieldValue::File(upload)) if upload.bytes.len() > *max => {
                    Err(format!("{label} must be no larger than {max} bytes"))
                }
                _ => Ok(()),
            },
            Rule::FileContentType(allowed) => match value {
                Some(FieldValue::File(upload))
                    if !allowed.iter().any(|ct| ct == &upload.content_type) =>
                {
                    Err(format!("{label} must be one of: {}", allowed.join(", ")))
                }
                _ => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldValue, FileUpload};

    #[test]
    fn required_rejects_missing_and_blank_text() {
        assert!(Rule::Required.check("Name", None).is_err());
        assert!(
            Rule::Required
                .check("Name", Some(&FieldValue::text("   ")))
                .is_err()
        );
        assert!(
            Rule::Required
                .check("Name", Some(&FieldValue::text("Asha")))
                .is_ok()
        );
    }

    #[test]
    fn email_rule_checks_shape_only_when_present() {
        assert!(Rule::Email.check("Email", None).is_ok());
        assert!(
            Rule::Email
                .check("Email", Some(&FieldValue::text("not-an-email")))
                .is_err()
        );
        assert!(
            Rule::Email
                .check("Email", Some(&FieldValue::text("a@x.com")))
                .is_ok()
        );
    }

    #[test]
    fn pattern_rule_surfaces_its_own_message() {
        let rule = Rule::pattern(r"^[6-9]\d{9}$", "Please enter a valid 10-digit phone number");
        let err = rule
            .check("Phone", Some(&FieldValue::text("12345")))
            .expect_err("short phone");
        assert_eq!(err, "Please enter a valid 10-digit phone number");
        assert!(rule.check("Phone", Some(&FieldValue::text("9876543210"))).is_ok());
    }

    #[test]
    fn file_rules_enforce_presence_size_and_type() {
        let photo = FieldValue::File(FileUpload::new("p.jpg", "image/jpeg", vec![0u8; 16]));
        assert!(Rule::FileRequired.check("Photo", None).is_err());
        assert!(Rule::FileRequired.check("Photo", Some(&photo)).is_ok());
        assert!(Rule::FileMaxBytes(8).check("Photo", Some(&photo)).is_err());
        assert!(Rule::FileMaxBytes(32).check("Photo", Some(&photo)).is_ok());
        let jpeg_only = Rule::FileContentType(vec!["image/jpeg".to_string()]);
        assert!(jpeg_only.check("Photo", Some(&photo)).is_ok());
        let png_only = Rule::FileContentType(vec!["image/png".to_string()]);
        assert!(png_only.check("Photo", Some(&photo)).is_err());
    }
}
