//! Validation rules
//!
//! Pure predicates over a single [`FieldValue`] and an optional parameter.
//! None of them hold state, so they can be called from any number of
//! threads at once.
//!
//! Rules other than `required` accept [`FieldValue::Absent`]: an optional
//! field that was not sent is only checked by `required`.

use std::sync::OnceLock;

use regex::Regex;

use super::schema::FieldValue;

/// Signature shared by every rule.
pub type RuleFn = fn(FieldValue<'_>, Option<&str>) -> bool;

/// Characters accepted as "special" by [`password`].
pub const PASSWORD_SPECIAL_CHARS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
static NON_DIGIT_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email pattern compiles")
    })
}

fn username_regex() -> &'static Regex {
    USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username pattern compiles"))
}

fn non_digit_regex() -> &'static Regex {
    NON_DIGIT_REGEX.get_or_init(|| Regex::new(r"\D").expect("non-digit pattern compiles"))
}

// ============================================================================
// Baseline rules
// ============================================================================

/// Fails on the zero value of the field's type or an absent field.
pub fn required(value: FieldValue<'_>, _param: Option<&str>) -> bool {
    !value.is_zero()
}

/// Email address syntax.
pub fn email(value: FieldValue<'_>, _param: Option<&str>) -> bool {
    match value {
        FieldValue::Absent => true,
        FieldValue::Str(s) => s.len() <= 254 && email_regex().is_match(s),
        _ => false,
    }
}

/// Lower bound: character count for strings, magnitude for numbers.
pub fn min(value: FieldValue<'_>, param: Option<&str>) -> bool {
    compare(value, param, |measured, bound| measured >= bound)
}

/// Upper bound: character count for strings, magnitude for numbers.
pub fn max(value: FieldValue<'_>, param: Option<&str>) -> bool {
    compare(value, param, |measured, bound| measured <= bound)
}

/// Rules whose parameter must parse as a number.
pub const NUMERIC_PARAM_RULES: &[&str] = &["min", "max"];

/// Numeric bound of a `min`/`max` parameter.
pub fn parse_bound(param: Option<&str>) -> Option<f64> {
    param.and_then(|p| p.trim().parse::<f64>().ok())
}

fn compare(value: FieldValue<'_>, param: Option<&str>, accept: fn(f64, f64) -> bool) -> bool {
    let Some(bound) = parse_bound(param) else {
        return false;
    };
    let measured = match value {
        FieldValue::Absent => return true,
        FieldValue::Str(s) => s.chars().count() as f64,
        FieldValue::Int(n) => n as f64,
        FieldValue::UInt(n) => n as f64,
        FieldValue::Float(n) => n,
        FieldValue::Bool(_) => return false,
    };
    accept(measured, bound)
}

// ============================================================================
// Custom rules
// ============================================================================

/// Password strength.
///
/// At least [`PASSWORD_MIN_LENGTH`] characters and at least one uppercase
/// letter, one lowercase letter, one digit and one character from
/// [`PASSWORD_SPECIAL_CHARS`]. Each condition is checked independently.
pub fn password(value: FieldValue<'_>, _param: Option<&str>) -> bool {
    let s = match value {
        FieldValue::Absent => return true,
        FieldValue::Str(s) => s,
        _ => return false,
    };

    if s.chars().count() < PASSWORD_MIN_LENGTH {
        return false;
    }

    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = s.chars().any(|c| c.is_ascii_digit());
    let has_special = s.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    has_upper && has_lower && has_digit && has_special
}

/// Phone number.
///
/// Non-digits are stripped first; the stripped number must have 10-15
/// digits. Then, in order:
/// * `62…` (Indonesia): 11-13 digits
/// * original starts with `+` (international): 11-16 digits
/// * `0…` (local): 10-12 digits
/// * anything else is accepted
pub fn phone(value: FieldValue<'_>, _param: Option<&str>) -> bool {
    let raw = match value {
        FieldValue::Absent => return true,
        FieldValue::Str(s) => s,
        _ => return false,
    };

    let digits = non_digit_regex().replace_all(raw, "");
    let len = digits.len();

    if !(10..=15).contains(&len) {
        return false;
    }

    if digits.starts_with("62") {
        return (11..=13).contains(&len);
    }

    if raw.starts_with('+') {
        return (11..=16).contains(&len);
    }

    if digits.starts_with('0') {
        return (10..=12).contains(&len);
    }

    true
}

/// User name.
///
/// 3-30 characters from `[A-Za-z0-9_-]`, not starting or ending with `_`
/// or `-`.
pub fn username(value: FieldValue<'_>, _param: Option<&str>) -> bool {
    let s = match value {
        FieldValue::Absent => return true,
        FieldValue::Str(s) => s,
        _ => return false,
    };

    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&s.len()) {
        return false;
    }

    if !username_regex().is_match(s) {
        return false;
    }

    let edge = |c: char| c == '_' || c == '-';
    !(s.starts_with(edge) || s.ends_with(edge))
}

/// Every rule shipped with the crate, by tag name.
pub const BUILTIN: &[(&str, RuleFn)] = &[
    ("required", required),
    ("email", email),
    ("min", min),
    ("max", max),
    ("password", password),
    ("phone", phone),
    ("username", username),
];
