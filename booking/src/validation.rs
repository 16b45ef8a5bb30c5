//! Field validators for the booking forms.
//!
//! Every validator is a pure function returning a [`ValidationResult`]; none
//! of them panic, and calling one twice with the same input yields the same
//! result. Card checks are cosmetic: they catch typos, not fraud.

use regex::Regex;
use std::sync::LazyLock;

/// Email shape: something, `@`, something, `.`, something, no whitespace
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Characters allowed in a phone number
const PHONE_PATTERN: &str = r"^\+?[0-9\s().\-]+$";

/// Letters (any script), spaces, hyphens, apostrophes and periods
const NAME_PATTERN: &str = r"^[\p{L}\s'.\-]+$";

/// `MM/YY`
const EXPIRY_PATTERN: &str = r"^([0-9]{2})/([0-9]{2})$";

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;
const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 19;

#[allow(clippy::expect_used)] // Literal patterns
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));
#[allow(clippy::expect_used)] // Literal patterns
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));
#[allow(clippy::expect_used)] // Literal patterns
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NAME_PATTERN).expect("valid regex"));
#[allow(clippy::expect_used)] // Literal patterns
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EXPIRY_PATTERN).expect("valid regex"));

/// Why a value was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Blank, or containing characters the field does not accept
    EmptyOrInvalid,
    /// Present but not in the expected shape
    InvalidFormat,
}

/// Outcome of validating one field
///
/// `errors` is ordered; callers may show only the first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the value is acceptable
    pub is_valid: bool,
    /// Human-readable messages, most important first
    pub errors: Vec<String>,
    /// Failure category, `None` when valid
    pub failure: Option<ValidationFailure>,
}

impl ValidationResult {
    /// A passing result
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            failure: None,
        }
    }

    /// A failing result with one message
    #[must_use]
    pub fn invalid(failure: ValidationFailure, message: impl Into<String>) -> Self {
        Self::from_errors(failure, vec![message.into()])
    }

    fn from_errors(failure: ValidationFailure, errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::valid()
        } else {
            Self {
                is_valid: false,
                errors,
                failure: Some(failure),
            }
        }
    }

    /// The message to show inline, if any
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Validate a person's name
#[must_use]
pub fn validate_name(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationFailure::EmptyOrInvalid, "Name is required");
    }
    if !NAME_RE.is_match(value) {
        return ValidationResult::invalid(
            ValidationFailure::EmptyOrInvalid,
            "Name can only contain letters, spaces, hyphens, apostrophes and periods",
        );
    }
    ValidationResult::valid()
}

/// Validate an email address
#[must_use]
pub fn validate_email(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationFailure::InvalidFormat, "Email is required");
    }
    if !EMAIL_RE.is_match(value) {
        return ValidationResult::invalid(
            ValidationFailure::InvalidFormat,
            "Please enter a valid email address",
        );
    }
    ValidationResult::valid()
}

/// Validate a phone number
#[must_use]
pub fn validate_phone(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationFailure::InvalidFormat, "Phone number is required");
    }

    let mut errors = Vec::new();
    if !PHONE_RE.is_match(value) {
        errors.push("Phone number can only contain digits, spaces, +, -, ., ( and )".to_string());
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        errors.push(format!(
            "Phone number must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits"
        ));
    }
    ValidationResult::from_errors(ValidationFailure::InvalidFormat, errors)
}

/// Validate a card number
///
/// Accepts spaces and dashes as separators and applies the Luhn checksum.
#[must_use]
pub fn validate_card_number(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationFailure::InvalidFormat, "Card number is required");
    }

    let compact: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    let mut errors = Vec::new();
    if !compact.chars().all(|c| c.is_ascii_digit()) {
        errors.push("Card number can only contain digits".to_string());
    }
    let digits: Vec<u32> = compact.chars().filter_map(|c| c.to_digit(10)).collect();
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits.len()) {
        errors.push(format!(
            "Card number must be between {MIN_CARD_DIGITS} and {MAX_CARD_DIGITS} digits"
        ));
    }
    if errors.is_empty() && !passes_luhn(&digits) {
        errors.push("Card number is not valid".to_string());
    }
    ValidationResult::from_errors(ValidationFailure::InvalidFormat, errors)
}

/// Validate a card expiry in `MM/YY` form
#[must_use]
pub fn validate_expiry_date(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationFailure::InvalidFormat, "Expiry date is required");
    }
    let Some(captures) = EXPIRY_RE.captures(value) else {
        return ValidationResult::invalid(
            ValidationFailure::InvalidFormat,
            "Expiry date must be in MM/YY format",
        );
    };
    let month: u32 = captures[1].parse().unwrap_or(0);
    if !(1..=12).contains(&month) {
        return ValidationResult::invalid(
            ValidationFailure::InvalidFormat,
            "Expiry month must be between 01 and 12",
        );
    }
    ValidationResult::valid()
}

/// Validate a card verification value (3 or 4 digits)
#[must_use]
pub fn validate_cvv(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationFailure::InvalidFormat, "CVV is required");
    }
    if !(3..=4).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::invalid(ValidationFailure::InvalidFormat, "CVV must be 3 or 4 digits");
    }
    ValidationResult::valid()
}

fn passes_luhn(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_idempotent() {
        for _ in 0..3 {
            assert_eq!(validate_email("a@b.com"), ValidationResult::valid());
        }
        let first = validate_email("not-an-email");
        assert!(!first.is_valid);
        assert!(!first.errors.is_empty());
        assert_eq!(first, validate_email("not-an-email"));
        assert_eq!(first.failure, Some(ValidationFailure::InvalidFormat));
    }

    #[test]
    fn test_email_rejects_whitespace() {
        assert!(!validate_email("a b@c.com").is_valid);
        assert!(validate_email("  a@b.co  ").is_valid);
        assert_eq!(validate_email("").first_error(), Some("Email is required"));
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Mary-Jane O'Neil").is_valid);
        assert!(validate_name("José").is_valid);
        let blank = validate_name("   ");
        assert_eq!(blank.failure, Some(ValidationFailure::EmptyOrInvalid));
        assert_eq!(blank.first_error(), Some("Name is required"));
        assert_eq!(
            validate_name("R2D2").failure,
            Some(ValidationFailure::EmptyOrInvalid)
        );
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("+1 (555) 123-4567").is_valid);
        assert!(!validate_phone("555-1234").is_valid);
        let bad = validate_phone("call me");
        assert_eq!(bad.errors.len(), 2);
        assert!(bad.errors[0].contains("can only contain"));
        assert!(validate_phone("555.010.4477 12").is_valid);
        assert_eq!(
            validate_phone("555_010_4477").first_error(),
            Some("Phone number can only contain digits, spaces, +, -, ., ( and )")
        );
    }

    #[test]
    fn test_card_number_rules() {
        assert!(validate_card_number("4242 4242 4242 4242").is_valid);
        assert!(validate_card_number("4111-1111-1111-1111").is_valid);
        assert_eq!(
            validate_card_number("4242 4242 4242 4241").first_error(),
            Some("Card number is not valid")
        );
        let short = validate_card_number("4242");
        assert_eq!(short.errors.len(), 1);
        assert!(short.errors[0].contains("between 13 and 19"));
        let letters = validate_card_number("4242 abcd");
        assert_eq!(letters.errors[0], "Card number can only contain digits");
    }

    #[test]
    fn test_expiry_rules() {
        assert!(validate_expiry_date("08/27").is_valid);
        assert!(!validate_expiry_date("13/27").is_valid);
        assert!(!validate_expiry_date("8/27").is_valid);
        assert!(!validate_expiry_date("").is_valid);
    }

    #[test]
    fn test_cvv_rules() {
        assert!(validate_cvv("123").is_valid);
        assert!(validate_cvv("1234").is_valid);
        assert!(!validate_cvv("12").is_valid);
        assert!(!validate_cvv("12a").is_valid);
    }
}
