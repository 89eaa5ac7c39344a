use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateUrl, ValidationError};

lazy_static! {
    /// Regex for category slugs
    /// Must be lowercase alphanumeric segments joined by single hyphens
    /// - Valid: "mens-shoes", "tv", "summer-2025"
    /// - Invalid: "-shoes", "shoes-", "mens--shoes", "Shoes", "mens_shoes"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for usernames: letters, digits and underscores only
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
}

/// Accepts a well-formed URL or an empty string (meaning "no image")
pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() || trimmed.validate_url() {
        return Ok(());
    }

    Err(ValidationError::new("url").with_message("Invalid URL format".into()))
}
