//! Request body rules for the public forms and the admin login.
//!
//! Every rule runs; failures are collected so the form can highlight all
//! offending fields at once.

use crate::db::models::{NewFormSubmission, NewQuote, PrivacyConsent, Service};
use crate::http::models::{FormSubmissionRequest, LoginRequest, QuoteSubmission};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// `local@domain.tld`. URL delimiters are refused so an address can never
/// carry extra query fields into a `mailto:` link.
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@?&#=%/]+@[^\s@?&#=%/]+\.[^\s@?&#=%/]+$").expect("email pattern compiles")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9+\s]+$").expect("phone pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone.trim())
}

/// Trimmed value, or an error pushed when it is empty.
fn required(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, message));
    }
    value.to_string()
}

fn email(errors: &mut Vec<FieldError>, field: &str, value: &str) -> String {
    if !is_valid_email(value) {
        errors.push(FieldError::new(field, "Valid email is required"));
    }
    value.trim().to_lowercase()
}

pub fn validate_quote(req: &QuoteSubmission) -> Result<NewQuote, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = required(&mut errors, "name", &req.name, "Name is required");

    let phone = req.phone.trim().to_string();
    if phone.is_empty() {
        errors.push(FieldError::new("phone", "Phone is required"));
    } else if !is_valid_phone(&phone) {
        errors.push(FieldError::new("phone", "Invalid phone number"));
    }

    let email = email(&mut errors, "email", &req.email);

    let service = req.service.trim().parse::<Service>().ok();
    if service.is_none() {
        errors.push(FieldError::new("service", "Invalid service"));
    }

    let privacy_consent = match (&req.privacy_consent, req.privacy) {
        (Some(raw), _) => raw.parse::<PrivacyConsent>().unwrap_or_else(|_| {
            errors.push(FieldError::new("privacy_consent", "Invalid privacy consent"));
            PrivacyConsent::NotAllowed
        }),
        (None, Some(allowed)) => PrivacyConsent::from(allowed),
        (None, None) => PrivacyConsent::default(),
    };

    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from);

    match service {
        Some(service) if errors.is_empty() => Ok(NewQuote {
            name,
            phone,
            email,
            service,
            message,
            privacy_consent,
        }),
        _ => Err(errors),
    }
}

pub fn validate_form_submission(req: &FormSubmissionRequest) -> Result<NewFormSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();

    let full_name = required(&mut errors, "fullName", &req.full_name, "Full name is required");
    let phone = required(&mut errors, "phone", &req.phone, "Phone number is required");
    let email = email(&mut errors, "email", &req.email);
    let service = required(&mut errors, "service", &req.service, "Service selection is required");
    let message = required(&mut errors, "message", &req.message, "Message is required");

    // Accepts `true` or the string "true", as HTML forms post it.
    let consented = match &req.gdpr_consent {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s == "true",
        _ => false,
    };
    if !consented {
        errors.push(FieldError::new("gdprConsent", "GDPR consent is required"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewFormSubmission {
        full_name,
        phone,
        email,
        service,
        message,
        gdpr_consent: true,
    })
}

pub fn validate_login(req: &LoginRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !is_valid_email(&req.email) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if req.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote() -> QuoteSubmission {
        QuoteSubmission::new("  Mario Rossi ", "+39 320 661 1519", " Mario@Example.COM ", Service::Plumbing, true)
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.it"));
        assert!(is_valid_email("  mario.rossi@gmail.com "));
        assert!(!is_valid_email("mario@localhost"));
        assert!(!is_valid_email("mario rossi@gmail.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("victim@x.com?cc=attacker@evil.com&body=hi"));
        assert!(!is_valid_email("a@b.it#x"));
        assert!(!is_valid_email("a=b@c.it"));
    }

    #[test]
    fn valid_quote_is_normalized() {
        let new = validate_quote(&quote().with_message("   ")).unwrap();
        assert_eq!(new.name, "Mario Rossi");
        assert_eq!(new.email, "mario@example.com");
        assert_eq!(new.service, Service::Plumbing);
        assert_eq!(new.privacy_consent, PrivacyConsent::Allowed);
        assert_eq!(new.message, None);
    }

    #[test]
    fn all_quote_errors_reported_together() {
        let req = QuoteSubmission {
            service: "gardening".to_string(),
            ..Default::default()
        };
        let errors = validate_quote(&req).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "phone", "email", "service"]);
        assert_eq!(errors[0].message, "Name is required");
        assert_eq!(errors[3].message, "Invalid service");
    }

    #[test]
    fn phone_must_be_digits_plus_and_spaces() {
        let mut req = quote();
        req.phone = "call me".to_string();
        let errors = validate_quote(&req).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("phone", "Invalid phone number")]);
    }

    #[test]
    fn explicit_consent_string_wins_over_flag() {
        let mut req = quote();
        req.privacy_consent = Some("not allowed".to_string());
        assert_eq!(validate_quote(&req).unwrap().privacy_consent, PrivacyConsent::NotAllowed);

        req.privacy_consent = Some("maybe".to_string());
        assert!(validate_quote(&req).is_err());

        req.privacy_consent = None;
        req.privacy = None;
        assert_eq!(validate_quote(&req).unwrap().privacy_consent, PrivacyConsent::NotAllowed);
    }

    #[test]
    fn form_submission_requires_consent() {
        let mut req: FormSubmissionRequest = serde_json::from_value(json!({
            "fullName": "Anna Bianchi",
            "phone": "0423 123456",
            "email": "anna@example.com",
            "service": "shutters",
            "message": "Shutter stuck halfway",
            "gdprConsent": "true"
        }))
        .unwrap();
        assert!(validate_form_submission(&req).is_ok());

        req.gdpr_consent = Some(json!(false));
        let errors = validate_form_submission(&req).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("gdprConsent", "GDPR consent is required")]);
    }

    #[test]
    fn login_rules() {
        let ok = LoginRequest {
            email: "admin@marioservice.com".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(&ok).is_ok());

        let bad = LoginRequest {
            email: "admin".to_string(),
            password: String::new(),
        };
        assert_eq!(validate_login(&bad).unwrap_err().len(), 2);
    }
}
