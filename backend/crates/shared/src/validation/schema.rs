//! Validation schema
//!
//! A schema is the explicit, statically declared list of fields of a type,
//! each with its serialization alias, ordered rule tags and an accessor that
//! reads the current value. Schemas are built once (usually in a
//! `LazyLock`) and shared for the life of the process.

use std::fmt;

/// A field value as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// An optional field that was not supplied.
    Absent,
}

impl FieldValue<'_> {
    /// Whether the value is the zero value of its type.
    pub fn is_zero(&self) -> bool {
        match *self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Int(n) => n == 0,
            FieldValue::UInt(n) => n == 0,
            FieldValue::Float(n) => n == 0.0,
            FieldValue::Bool(b) => !b,
            FieldValue::Absent => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::UInt(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Absent => Ok(()),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a, T> From<&'a Option<T>> for FieldValue<'a>
where
    &'a T: Into<FieldValue<'a>>,
{
    fn from(value: &'a Option<T>) -> Self {
        value.as_ref().map_or(FieldValue::Absent, Into::into)
    }
}

macro_rules! impl_from_number {
    ($variant:ident, $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue<'_> {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value as $target)
                }
            }

            impl From<&$ty> for FieldValue<'_> {
                fn from(value: &$ty) -> Self {
                    FieldValue::$variant(*value as $target)
                }
            }
        )*
    };
}

impl_from_number!(Int, i64: i8, i16, i32, i64);
impl_from_number!(UInt, u64: u8, u16, u32, u64, usize);
impl_from_number!(Float, f64: f32, f64);

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&bool> for FieldValue<'_> {
    fn from(value: &bool) -> Self {
        FieldValue::Bool(*value)
    }
}

/// A declared association between a field and a rule.
///
/// ```rust
/// use kernel::validation::schema::Tag;
///
/// const PASSWORD: [Tag; 2] = [Tag::new("required"), Tag::with_param("min", "6")];
/// assert_eq!(PASSWORD[1].param, Some("6"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub name: &'static str,
    pub param: Option<&'static str>,
}

impl Tag {
    pub const fn new(name: &'static str) -> Self {
        Self { name, param: None }
    }

    pub const fn with_param(name: &'static str, param: &'static str) -> Self {
        Self {
            name,
            param: Some(param),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param {
            Some(param) => write!(f, "{}={}", self.name, param),
            None => f.write_str(self.name),
        }
    }
}

/// Tags for the built-in rules.
///
/// These are constants so that `&[REQUIRED, EMAIL]` is a `'static` slice.
pub mod tags {
    use super::Tag;

    pub const REQUIRED: Tag = Tag::new("required");
    pub const EMAIL: Tag = Tag::new("email");
    pub const PASSWORD: Tag = Tag::new("password");
    pub const PHONE: Tag = Tag::new("phone");
    pub const USERNAME: Tag = Tag::new("username");
}

/// Reads one field's current value out of a `T`.
pub type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// One field of a [`Schema`].
pub struct FieldSpec<T> {
    ident: &'static str,
    alias: Option<&'static str>,
    tags: &'static [Tag],
    accessor: Accessor<T>,
}

impl<T> FieldSpec<T> {
    pub fn new(ident: &'static str, accessor: Accessor<T>) -> Self {
        Self {
            ident,
            alias: None,
            tags: &[],
            accessor,
        }
    }

    /// Sets the serialization alias the field is reported under.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Sets the rule tags, evaluated in the given order.
    pub fn rules(mut self, tags: &'static [Tag]) -> Self {
        self.tags = tags;
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn tags(&self) -> &'static [Tag] {
        self.tags
    }

    pub fn value<'a>(&self, target: &'a T) -> FieldValue<'a> {
        (self.accessor)(target)
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("ident", &self.ident)
            .field("alias", &self.alias)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Ordered field declarations for a `T`.
pub struct Schema<T> {
    fields: Vec<FieldSpec<T>>,
}

impl<T> Schema<T> {
    pub fn new(fields: Vec<FieldSpec<T>>) -> Self {
        Self { fields }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("fields", &self.fields).finish()
    }
}

/// Types that carry a static validation schema.
///
/// ## Examples
/// ```rust
/// use std::sync::LazyLock;
/// use kernel::validation::schema::{FieldSpec, Schema, Validate, tags};
///
/// struct Login {
///     email: String,
/// }
///
/// static LOGIN: LazyLock<Schema<Login>> = LazyLock::new(|| {
///     Schema::new(vec![
///         FieldSpec::new("email", |l: &Login| (&l.email).into())
///             .rules(&[tags::REQUIRED, tags::EMAIL]),
///     ])
/// });
///
/// impl Validate for Login {
///     fn schema() -> &'static Schema<Self> {
///         &LOGIN
///     }
/// }
/// ```
pub trait Validate: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Profile {
        name: String,
        age: u8,
        nickname: Option<String>,
    }

    #[test]
    fn test_accessors_read_current_values() {
        let schema = Schema::new(vec![
            FieldSpec::new("name", |p: &Profile| (&p.name).into()),
            FieldSpec::new("age", |p: &Profile| p.age.into()),
            FieldSpec::new("nickname", |p: &Profile| (&p.nickname).into()),
        ]);
        let profile = Profile {
            name: "Ayu".into(),
            age: 30,
            nickname: None,
        };

        let values: Vec<_> = schema.fields().iter().map(|f| f.value(&profile)).collect();
        assert_eq!(
            values,
            vec![
                FieldValue::Str("Ayu"),
                FieldValue::UInt(30),
                FieldValue::Absent
            ]
        );
    }

    #[test]
    fn test_zero_values() {
        assert!(FieldValue::Str("").is_zero());
        assert!(FieldValue::Int(0).is_zero());
        assert!(FieldValue::Bool(false).is_zero());
        assert!(FieldValue::Absent.is_zero());
        assert!(!FieldValue::Str(" ").is_zero());
        assert!(!FieldValue::Float(0.5).is_zero());
    }

    #[test]
    fn test_display_stringifies_values() {
        assert_eq!(FieldValue::Str("abc").to_string(), "abc");
        assert_eq!(FieldValue::Int(-4).to_string(), "-4");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::Absent.to_string(), "");
        assert_eq!(Tag::with_param("min", "6").to_string(), "min=6");
    }
}
