//! Common validation utilities.

use validator::ValidationError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum accepted password length (Argon2 accepts more, forms should not).
pub const MAX_PASSWORD_LENGTH: usize = 128;

lazy_static::lazy_static! {
    /// Optional leading `+`, then digits with spaces, dashes or parentheses.
    pub static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a phone number such as `+1234567890` or `022 555-0101`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(error("phone_format", "Phone number format is invalid"))
    }
}

/// Validates that a free-text field is not just whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// Validates password length bounds.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(error(
            "password_short",
            "Password must be at least 6 characters",
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(error(
            "password_long",
            "Password must be at most 128 characters",
        ));
    }
    Ok(())
}

/// Normalizes an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}
