//! Field naming
//!
//! Resolves the name a field is reported under in validation errors.

/// Alias meaning "never serialize this field".
pub const SKIP_ALIAS: &str = "-";

/// Returns the externally visible name of a field.
///
/// The serialization alias wins over the structural identifier. Anything
/// after the first `,` in the alias is treated as options and ignored, and
/// an empty alias name falls back to `ident`. The [`SKIP_ALIAS`] sentinel
/// yields `None`: the field must not appear in validation errors at all.
///
/// ```rust
/// use kernel::validation::naming::resolve_field_name;
///
/// assert_eq!(resolve_field_name("user_name", Some("username")), Some("username"));
/// assert_eq!(resolve_field_name("email", None), Some("email"));
/// assert_eq!(resolve_field_name("secret", Some("-")), None);
/// ```
pub fn resolve_field_name<'a>(ident: &'a str, alias: Option<&'a str>) -> Option<&'a str> {
    let Some(alias) = alias else {
        return Some(ident);
    };
    let name = alias.split(',').next().unwrap_or_default().trim();
    match name {
        SKIP_ALIAS => None,
        "" => Some(ident),
        name => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_preferred() {
        assert_eq!(resolve_field_name("PhoneNumber", Some("phone")), Some("phone"));
    }

    #[test]
    fn test_alias_options_are_ignored() {
        assert_eq!(resolve_field_name("phone", Some("phone,omitempty")), Some("phone"));
        assert_eq!(resolve_field_name("phone", Some(",omitempty")), Some("phone"));
    }

    #[test]
    fn test_skip_sentinel() {
        assert_eq!(resolve_field_name("internal", Some(SKIP_ALIAS)), None);
    }

    #[test]
    fn test_missing_alias_uses_ident() {
        assert_eq!(resolve_field_name("email", None), Some("email"));
        assert_eq!(resolve_field_name("email", Some("")), Some("email"));
    }
}
