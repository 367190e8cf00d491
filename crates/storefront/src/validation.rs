//! Form validation for login, sign-up, and payment.
//!
//! Validation runs before anything is submitted and never touches a store.
//! Each field reports at most one message: the first rule it breaks.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use pazar_core::Email;

use crate::services::auth::Credentials;

const MIN_PASSWORD_LENGTH: usize = 6;
const MIN_CARD_HOLDER_LENGTH: usize = 5;
const CARD_NUMBER_LENGTH: usize = 19;

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9 ]{19}$").expect("Invalid regex"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("Invalid regex"));
static CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("Invalid regex"));
static CARD_HOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZĞÜŞİÖÇ ]+$").expect("Invalid regex"));

/// Field name to message, one entry per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form input.
#[derive(Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
}

/// Card details for the mocked payment.
#[derive(Deserialize)]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub card_holder: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(&self.email, &mut errors);
        check_password_length(&self.password, &mut errors);
        finish(email, self.password, errors)
    }
}

impl SignUpForm {
    /// Login rules plus an uppercase letter, a lowercase letter, and a digit
    /// in the password.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(&self.email, &mut errors);
        check_password_length(&self.password, &mut errors);

        let password = &self.password;
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.add("password", "Password must contain an uppercase letter");
        } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.add("password", "Password must contain a lowercase letter");
        } else if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.add("password", "Password must contain a digit");
        }

        finish(email, self.password, errors)
    }
}

impl PaymentForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.card_number.is_empty() {
            errors.add("card_number", "Card number is required");
        } else if !CARD_NUMBER_RE.is_match(&self.card_number) {
            errors.add("card_number", "Enter a valid card number");
        }

        if self.expiry_date.is_empty() {
            errors.add("expiry_date", "Expiry date is required");
        } else if !EXPIRY_RE.is_match(&self.expiry_date) {
            errors.add("expiry_date", "Use the MM/YY format");
        }

        if self.cvv.is_empty() {
            errors.add("cvv", "CVV is required");
        } else if !CVV_RE.is_match(&self.cvv) {
            errors.add("cvv", "Enter a valid CVV");
        }

        if self.card_holder.is_empty() {
            errors.add("card_holder", "Card holder name is required");
        } else if self.card_holder.chars().count() < MIN_CARD_HOLDER_LENGTH {
            errors.add(
                "card_holder",
                format!("Enter at least {MIN_CARD_HOLDER_LENGTH} characters"),
            );
        } else if !CARD_HOLDER_RE.is_match(&self.card_holder) {
            errors.add("card_holder", "Use uppercase letters only");
        }

        errors.into_result(())
    }
}

fn check_email(input: &str, errors: &mut FieldErrors) -> Option<Email> {
    if input.is_empty() {
        errors.add("email", "Email is required");
        return None;
    }
    match Email::parse(input) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add("email", "Enter a valid email address");
            None
        }
    }
}

fn check_password_length(password: &str, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }
}

fn finish(
    email: Option<Email>,
    password: String,
    errors: FieldErrors,
) -> Result<Credentials, FieldErrors> {
    match email {
        Some(email) if errors.is_empty() => Ok(Credentials {
            email,
            password: SecretString::from(password),
        }),
        _ => Err(errors),
    }
}

/// Strip whitespace, group digits by four, and cap at the card length.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let cleaned: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    let grouped = cleaned
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    grouped.chars().take(CARD_NUMBER_LENGTH).collect()
}

/// Keep digits only and insert a `/` after the month.
#[must_use]
pub fn format_expiry_date(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 2 {
        let (month, rest) = digits.split_at(2);
        let year: String = rest.chars().take(2).collect();
        format!("{month}/{year}")
    } else {
        digits
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payment(card: &str, expiry: &str, cvv: &str, holder: &str) -> PaymentForm {
        PaymentForm {
            card_number: card.to_string(),
            expiry_date: expiry.to_string(),
            cvv: cvv.to_string(),
            card_holder: holder.to_string(),
        }
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            email: "eve.holt@reqres.in".into(),
            password: "cityslicka".into(),
        };
        let credentials = form.validate().unwrap();
        assert_eq!(credentials.email.as_str(), "eve.holt@reqres.in");
    }

    #[test]
    fn test_login_reports_each_field() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "abc".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_login_required_fields() {
        let form = LoginForm {
            email: String::new(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_sign_up_password_rules() {
        let check = |password: &str| {
            SignUpForm {
                email: "a@example.com".into(),
                password: password.into(),
            }
            .validate()
            .err()
            .and_then(|e| e.get("password").map(String::from))
        };
        assert_eq!(
            check("lowercase1").as_deref(),
            Some("Password must contain an uppercase letter")
        );
        assert_eq!(
            check("UPPERCASE1").as_deref(),
            Some("Password must contain a lowercase letter")
        );
        assert_eq!(
            check("NoDigits").as_deref(),
            Some("Password must contain a digit")
        );
        assert_eq!(check("Secret1"), None);
    }

    #[test]
    fn test_payment_valid() {
        let form = payment("4242 4242 4242 4242", "12/29", "123", "AYŞE YILMAZ");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_payment_invalid_fields() {
        let form = payment("4242 4242", "13/29", "12a", "ayşe");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("card_number"), Some("Enter a valid card number"));
        assert_eq!(errors.get("expiry_date"), Some("Use the MM/YY format"));
        assert_eq!(errors.get("cvv"), Some("Enter a valid CVV"));
        assert_eq!(
            errors.get("card_holder"),
            Some("Enter at least 5 characters")
        );
    }

    #[test]
    fn test_card_holder_must_be_uppercase() {
        let form = payment("4242 4242 4242 4242", "01/30", "999", "Ayse Yilmaz");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("card_holder"), Some("Use uppercase letters only"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("4242 42"), "4242 42");
        assert_eq!(
            format_card_number("42424242424242429999"),
            "4242 4242 4242 4242"
        );
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_expiry_date() {
        assert_eq!(format_expiry_date("1"), "1");
        assert_eq!(format_expiry_date("12"), "12/");
        assert_eq!(format_expiry_date("1229"), "12/29");
        assert_eq!(format_expiry_date("12/2999"), "12/29");
    }
}
