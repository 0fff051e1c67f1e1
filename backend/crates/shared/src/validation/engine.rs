//! Validation engine
//!
//! [`Validator`] owns the rule registry and walks a [`Schema`], collecting
//! every failure instead of stopping at the first one.
//!
//! Build one `Validator` at startup and share it (`Arc<Validator>`); the
//! registry cannot change after [`ValidatorBuilder::build`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::message::{self, Locale};
use super::naming::resolve_field_name;
use super::rules::{self, RuleFn};
use super::schema::{Schema, Tag, Validate};
use crate::error::app_error::AppError;
use crate::error::code::ErrorCode;

// ============================================================================
// Error Types
// ============================================================================

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Externally visible field name
    pub field: String,
    /// Tag of the rule that failed
    pub tag: String,
    /// Stringified value that failed
    pub value: String,
    /// Rendered message in the validator's locale
    pub message: String,
}

/// Ordered validation failures, in field then rule evaluation order.
///
/// Never empty when returned from [`Validator::validate_struct`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// Groups messages by field, keeping evaluation order inside each field.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for err in &self.0 {
            map.entry(err.field.clone())
                .or_default()
                .push(err.message.clone());
        }
        map
    }

    /// Wraps the failures into a 400 `VALIDATION_ERROR`.
    ///
    /// `details` carries the joined messages; the failures stay reachable
    /// through the error's cause chain.
    pub fn into_app_error(self) -> AppError {
        let details = self.to_string();
        AppError::wrap(self, ErrorCode::Validation, "Validation failed").with_details(details)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A schema refers to something the validator cannot run.
///
/// This is a programming error, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field `{field}` uses unregistered validation rule `{tag}`")]
    UnknownRule {
        field: &'static str,
        tag: &'static str,
    },

    #[error("field `{field}` rule `{tag}` needs a numeric parameter, got {param:?}")]
    InvalidParam {
        field: &'static str,
        tag: &'static str,
        param: Option<&'static str>,
    },
}

/// Outcome of a failed [`Validator::validate_struct`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidateError {
    /// The input broke one or more rules.
    #[error(transparent)]
    Invalid(ValidationErrors),

    /// The schema itself is broken.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ValidateError {
    /// The failures, when this is an input problem.
    pub fn as_invalid(&self) -> Option<&ValidationErrors> {
        match self {
            ValidateError::Invalid(errors) => Some(errors),
            ValidateError::Schema(_) => None,
        }
    }
}

impl From<ValidateError> for AppError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::Invalid(errors) => errors.into_app_error(),
            ValidateError::Schema(schema) => {
                AppError::wrap(schema, ErrorCode::Internal, "Internal server error")
            }
        }
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Rule registry plus the locale messages are rendered in.
#[derive(Clone)]
pub struct Validator {
    rules: HashMap<&'static str, RuleFn>,
    locale: Locale,
}

/// Registers rules before the [`Validator`] is frozen.
pub struct ValidatorBuilder {
    rules: HashMap<&'static str, RuleFn>,
    locale: Locale,
}

impl ValidatorBuilder {
    /// Adds or replaces the rule registered under `name`.
    pub fn rule(mut self, name: &'static str, rule: RuleFn) -> Self {
        self.rules.insert(name, rule);
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn build(self) -> Validator {
        tracing::debug!(
            rules = self.rules.len(),
            locale = %self.locale,
            "Validator initialized"
        );
        Validator {
            rules: self.rules,
            locale: self.locale,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl Validator {
    /// Validator with every built-in rule, rendering messages in `locale`.
    pub fn new(locale: Locale) -> Self {
        Self::builder().locale(locale).build()
    }

    /// Builder pre-loaded with the built-in rules.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder {
            rules: rules::BUILTIN.iter().copied().collect(),
            locale: Locale::default(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Checks that every tag in `T`'s schema resolves to a registered rule.
    ///
    /// Call this at startup so a broken schema stops the process before it
    /// serves requests.
    pub fn check<T: Validate>(&self) -> Result<(), SchemaError> {
        self.check_schema(T::schema())
    }

    pub fn check_schema<T>(&self, schema: &Schema<T>) -> Result<(), SchemaError> {
        for field in schema.fields() {
            for tag in field.tags() {
                self.lookup(field.ident(), tag)?;
            }
        }
        Ok(())
    }

    /// Validates `target` against its own schema.
    pub fn validate_struct<T: Validate>(&self, target: &T) -> Result<(), ValidateError> {
        self.validate_with(T::schema(), target)
    }

    /// Validates `target` against `schema`.
    ///
    /// All fields and all rules are evaluated. Fields whose alias is the
    /// skip sentinel are evaluated but never reported.
    pub fn validate_with<T>(&self, schema: &Schema<T>, target: &T) -> Result<(), ValidateError> {
        let mut errors = ValidationErrors::new();

        for field in schema.fields() {
            let name = resolve_field_name(field.ident(), field.alias_name());
            let value = field.value(target);

            for tag in field.tags() {
                let rule = self.lookup(field.ident(), tag)?;
                if rule(value, tag.param) {
                    continue;
                }
                let Some(name) = name else {
                    continue;
                };
                errors.push(FieldError {
                    field: name.to_string(),
                    tag: tag.name.to_string(),
                    value: value.to_string(),
                    message: message::render(self.locale, tag.name, name, tag.param),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidateError::Invalid(errors))
        }
    }

    fn lookup(&self, field: &'static str, tag: &Tag) -> Result<RuleFn, SchemaError> {
        let rule = self
            .rules
            .get(tag.name)
            .copied()
            .ok_or(SchemaError::UnknownRule {
                field,
                tag: tag.name,
            })?;

        if rules::NUMERIC_PARAM_RULES.contains(&tag.name)
            && rules::parse_bound(tag.param).is_none()
        {
            return Err(SchemaError::InvalidParam {
                field,
                tag: tag.name,
                param: tag.param,
            });
        }
        Ok(rule)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("Validator")
            .field("rules", &names)
            .field("locale", &self.locale)
            .finish()
    }
}
