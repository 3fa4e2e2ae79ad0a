use chrono::NaiveDate;

use crate::contract::model::NewUser;
use crate::domain::error::DomainError;

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Trimmed value, `None` when absent or blank.
pub fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse a `YYYY-MM-DD` date; blank input counts as absent.
pub fn parse_date_of_birth(raw: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                DomainError::validation("dateOfBirth", "Date of birth must be formatted YYYY-MM-DD")
            }),
    }
}

/// Checks a registration that already has a normalised email.
pub fn validate_new_user(u: &NewUser, min_password_len: usize) -> Result<(), DomainError> {
    if u.name.trim().is_empty() {
        return Err(DomainError::validation("name", "Name is required"));
    }
    if u.email.is_empty() {
        return Err(DomainError::validation("email", "Email is required"));
    }
    if !looks_like_email(&u.email) {
        return Err(DomainError::validation(
            "email",
            format!("Email '{}' is invalid", u.email),
        ));
    }
    if u.password.chars().count() < min_password_len {
        return Err(DomainError::validation(
            "password",
            format!("Password must be at least {min_password_len} characters"),
        ));
    }
    Ok(())
}
