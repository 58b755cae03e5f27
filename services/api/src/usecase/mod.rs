pub mod auth;
pub mod dashboard;
pub mod product;
pub mod sale;
pub mod setup;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

use crate::error::ApiError;

/// Trimmed value of a required text field; blank input is a validation error.
pub(crate) fn require(value: String, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Trimmed email address with a minimal shape check.
pub(crate) fn require_email(value: String) -> Result<String, ApiError> {
    let email = require(value, "email")?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ApiError::validation("email is invalid")),
    }
}

/// Passwords are taken verbatim (no trimming) but must not be empty.
pub(crate) fn require_password(value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation("password is required"));
    }
    Ok(())
}
