//! Form input validation
//!
//! Form fields are controlled text inputs, so every check works on `&str`
//! and a blank input counts as absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{DashboardError, DashboardResult, FieldErrors, ValidationBuilder};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-.]{7,20}$").expect("phone pattern is valid"));

/// Accepted date-time input formats, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Validated wrapper type - indicates the value has been validated
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    PHONE_RE.is_match(value) && value.chars().filter(char::is_ascii_digit).count() >= 7
}

/// Trimmed value, or `None` when blank
pub fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parses `YYYY-MM-DD HH:MM` with optional seconds and fraction (or a bare
/// date, read as midnight UTC)
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Collects field errors for one form submission
#[derive(Debug, Default)]
pub struct Validator {
    builder: ValidationBuilder,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add error for a field
    pub fn error(mut self, field: &str, message: &str) -> Self {
        self.builder = self.builder.error(field, message);
        self
    }

    /// Add error if condition is true
    pub fn error_if(self, condition: bool, field: &str, message: &str) -> Self {
        if condition {
            self.error(field, message)
        } else {
            self
        }
    }

    pub fn required(self, value: &str, field: &str, label: &str) -> Self {
        let blank = value.trim().is_empty();
        self.error_if(blank, field, &format!("{} is required", label))
    }

    /// Required and well-formed
    pub fn email(self, value: &str, field: &str) -> Self {
        if value.trim().is_empty() {
            return self.error(field, "Email is required");
        }
        let malformed = !is_valid_email(value);
        self.error_if(malformed, field, "Invalid email format")
    }

    /// Blank is accepted, anything else must be well-formed
    pub fn optional_email(self, value: &str, field: &str) -> Self {
        let malformed = !value.trim().is_empty() && !is_valid_email(value);
        self.error_if(malformed, field, "Invalid email format")
    }

    pub fn phone(self, value: &str, field: &str) -> Self {
        if value.trim().is_empty() {
            return self.error(field, "Phone is required");
        }
        let malformed = !is_valid_phone(value);
        self.error_if(malformed, field, "Invalid phone number")
    }

    pub fn optional_phone(self, value: &str, field: &str) -> Self {
        let malformed = !value.trim().is_empty() && !is_valid_phone(value);
        self.error_if(malformed, field, "Invalid phone number")
    }

    pub fn max_length(self, value: &str, field: &str, max: usize) -> Self {
        let too_long = value.trim().chars().count() > max;
        self.error_if(too_long, field, &format!("Must be {} characters or less", max))
    }

    /// Optional non-negative money amount
    pub fn optional_amount(self, value: &str, field: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }
        match Decimal::from_str(value) {
            Ok(amount) if amount.is_sign_negative() => self.error(field, "Amount cannot be negative"),
            Ok(_) => self,
            Err(_) => self.error(field, "Amount must be a number"),
        }
    }

    pub fn positive_integer(self, value: &str, field: &str, max: u32) -> Self {
        match value.trim().parse::<u32>() {
            Ok(n) if n > 0 && n <= max => self,
            _ => self.error(field, &format!("Must be a whole number between 1 and {}", max)),
        }
    }

    pub fn optional_datetime(self, value: &str, field: &str) -> Self {
        let malformed = !value.trim().is_empty() && parse_datetime(value).is_none();
        self.error_if(malformed, field, "Use the format YYYY-MM-DD HH:MM")
    }

    /// Value must parse as one of the allowed options
    pub fn one_of(self, value: &str, field: &str, allowed: &[&str]) -> Self {
        let lower = value.trim().to_lowercase();
        let known = allowed.iter().any(|a| a.to_lowercase() == lower);
        self.error_if(!known, field, &format!("Must be one of: {}", allowed.join(", ")))
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        !self.builder.has_errors()
    }

    /// Finish validation, returning error if any
    pub fn finish(self) -> DashboardResult<()> {
        match self.builder.build() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Finish with a value if valid
    pub fn finish_with<T>(self, value: impl FnOnce() -> T) -> Result<Validated<T>, FieldErrors> {
        match self.finish() {
            Ok(()) => Ok(Validated(value())),
            Err(DashboardError::Validation { details }) => Err(details),
            Err(_) => Err(FieldErrors::new()),
        }
    }
}
