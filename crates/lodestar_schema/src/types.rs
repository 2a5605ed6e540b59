//! Mapping declared parameter types onto the schema vocabulary.
//!
//! A [`DeclaredType`] is parsed from type text as it appears in a signature
//! (`String`, `Option<i64>`, `crate::units::Units`, ...). The [`TypeMapper`]
//! resolves it against an [`EnumTable`] of sibling enum declarations.

use crate::enums::EnumTable;
use crate::error::UnsupportedType;
use core::fmt;
use serde::{Deserialize, Serialize};

const STRING_TYPES: &[&str] = &["String"];
const INTEGER_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
];
const NUMBER_TYPES: &[&str] = &["f32", "f64"];
const BOOLEAN_TYPES: &[&str] = &["bool"];

/// Bare names that can never be a closed string enum.
const NON_ENUM_TYPES: &[&str] = &[
    "char", "str", "i128", "u128", "Self", "Vec", "HashMap", "BTreeMap", "HashSet", "Box", "Rc",
    "Arc", "Value", "PathBuf", "Path", "Duration",
];

/// The schema type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// JSON string.
    String,
    /// JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
}

impl SchemaType {
    /// Returns the JSON Schema name of this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Maps a primitive type name to its schema type.
    #[must_use]
    pub fn from_primitive(name: &str) -> Option<Self> {
        if STRING_TYPES.contains(&name) {
            Some(Self::String)
        } else if INTEGER_TYPES.contains(&name) {
            Some(Self::Integer)
        } else if NUMBER_TYPES.contains(&name) {
            Some(Self::Number)
        } else if BOOLEAN_TYPES.contains(&name) {
            Some(Self::Boolean)
        } else {
            None
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter type as declared in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// A path type such as `String`, `std::option::Option<T>` or `units::Units`.
    Path {
        /// The full path, segments joined by `::`.
        path: String,
        /// Angle-bracketed generic arguments, if any.
        args: Vec<DeclaredType>,
    },
    /// Anything else: references, tuples, slices, arrays, trait objects.
    Other(String),
}

impl DeclaredType {
    /// Parses declared type text. Whitespace is insignificant, so both
    /// `Option<String>` and token-stream text like `Option < String >` work.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        parse_type(&compact(text))
    }

    /// A path type with no generic arguments.
    pub fn named(path: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// `Option<inner>`.
    #[must_use]
    pub fn optional(inner: DeclaredType) -> Self {
        Self::Path {
            path: "Option".to_string(),
            args: vec![inner],
        }
    }

    /// Returns the last path segment, e.g. `Units` for `crate::units::Units`.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match self {
            Self::Path { path, .. } => path.rsplit("::").next(),
            Self::Other(_) => None,
        }
    }

    /// Returns `T` when this type is `Option<T>`.
    #[must_use]
    pub fn option_inner(&self) -> Option<&DeclaredType> {
        match self {
            Self::Path { args, .. } if args.len() == 1 && self.ident() == Some("Option") => {
                args.first()
            }
            _ => None,
        }
    }
}

impl From<&str> for DeclaredType {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for DeclaredType {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { path, args } => {
                f.write_str(path)?;
                if let Some((first, rest)) = args.split_first() {
                    write!(f, "<{first}")?;
                    for arg in rest {
                        write!(f, ", {arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Other(text) => f.write_str(text),
        }
    }
}

/// Where the allowed values of a string enumeration come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enumeration {
    /// Case names resolved from a sibling declaration, in declaration order.
    Cases(Vec<String>),
    /// The enum is declared elsewhere; cases are looked up by this key at
    /// render and dispatch time.
    Deferred(String),
}

/// Result of mapping a [`DeclaredType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Schema type of the (unwrapped) value.
    pub schema_type: SchemaType,
    /// Enumeration source for closed string enums.
    pub enumeration: Option<Enumeration>,
    /// Whether the declared type was `Option<_>`.
    pub optional: bool,
}

/// Maps declared types to schema types.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    scope: &'a EnumTable,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper that resolves enums against `scope`.
    #[must_use]
    pub fn new(scope: &'a EnumTable) -> Self {
        Self { scope }
    }

    /// Maps a declared type, unwrapping `Option` first.
    ///
    /// Nested optionals collapse to a single level of optionality.
    pub fn map(&self, ty: &DeclaredType) -> Result<MappedType, UnsupportedType> {
        let Some(mut inner) = ty.option_inner() else {
            return self.map_required(ty);
        };
        while let Some(next) = inner.option_inner() {
            tracing::warn!(declared = %ty, "collapsing nested Option");
            inner = next;
        }
        let mut mapped = self.map_required(inner)?;
        mapped.optional = true;
        Ok(mapped)
    }

    fn map_required(&self, ty: &DeclaredType) -> Result<MappedType, UnsupportedType> {
        let (path, ident) = match ty {
            DeclaredType::Path { path, args } if args.is_empty() => {
                (path.as_str(), ty.ident().unwrap_or(path.as_str()))
            }
            _ => return Err(UnsupportedType::new(ty.to_string())),
        };

        if let Some(schema_type) = SchemaType::from_primitive(ident) {
            return Ok(MappedType {
                schema_type,
                enumeration: None,
                optional: false,
            });
        }

        if let Some(cases) = self.scope.get(path).or_else(|| self.scope.get(ident)) {
            return Ok(MappedType {
                schema_type: SchemaType::String,
                enumeration: Some(Enumeration::Cases(cases.to_vec())),
                optional: false,
            });
        }

        if NON_ENUM_TYPES.contains(&ident) || !is_type_name(ident) {
            return Err(UnsupportedType::new(ty.to_string()));
        }

        Ok(MappedType {
            schema_type: SchemaType::String,
            enumeration: Some(Enumeration::Deferred(path.to_string())),
            optional: false,
        })
    }
}

/// A plausible user-declared type name: an identifier starting with an
/// uppercase letter.
fn is_type_name(ident: &str) -> bool {
    let mut chars = ident.chars();
    chars.next().is_some_and(char::is_uppercase)
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Removes insignificant whitespace from type text.
///
/// A single space is kept only between two identifier characters, as in
/// `dyn Trait` or `&'a mut T`.
fn compact(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && is_ident_char(c) && out.chars().last().is_some_and(is_ident_char) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn parse_type(text: &str) -> DeclaredType {
    let starts_path = text
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':');
    if !starts_path || text.contains(' ') {
        return DeclaredType::Other(text.to_string());
    }

    let Some(open) = text.find('<') else {
        return if is_path(text) {
            DeclaredType::named(text.trim_start_matches("::"))
        } else {
            DeclaredType::Other(text.to_string())
        };
    };

    let (path, rest) = text.split_at(open);
    let Some(inner) = rest
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    else {
        return DeclaredType::Other(text.to_string());
    };
    if !is_path(path) {
        return DeclaredType::Other(text.to_string());
    }

    match split_top_level(inner) {
        Some(args) => DeclaredType::Path {
            path: path.trim_start_matches("::").to_string(),
            args: args.into_iter().map(parse_type).collect(),
        },
        None => DeclaredType::Other(text.to_string()),
    }
}

fn is_path(text: &str) -> bool {
    let text = text.trim_start_matches("::");
    !text.is_empty()
        && text
            .split("::")
            .all(|segment| !segment.is_empty() && segment.chars().all(is_word_char))
}

/// Splits generic arguments on commas that are not nested in brackets.
/// Returns `None` when brackets are unbalanced.
fn split_top_level(text: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let last = &text[start..];
    if !last.is_empty() {
        parts.push(last);
    }
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(text: &str) -> Result<MappedType, UnsupportedType> {
        TypeMapper::new(&EnumTable::new()).map(&DeclaredType::parse(text))
    }

    #[test]
    fn primitives() {
        assert_eq!(map("String").unwrap().schema_type, SchemaType::String);
        assert_eq!(map("i64").unwrap().schema_type, SchemaType::Integer);
        assert_eq!(map("usize").unwrap().schema_type, SchemaType::Integer);
        assert_eq!(map("f32").unwrap().schema_type, SchemaType::Number);
        assert_eq!(map("bool").unwrap().schema_type, SchemaType::Boolean);
        assert!(!map("bool").unwrap().optional);
        assert_eq!(
            map("std::string::String").unwrap().schema_type,
            SchemaType::String
        );
    }

    #[test]
    fn option_unwraps_and_marks_optional() {
        let mapped = map("Option<f64>").unwrap();
        assert_eq!(mapped.schema_type, SchemaType::Number);
        assert!(mapped.optional);

        let spaced = map("core :: option :: Option < String >").unwrap();
        assert_eq!(spaced.schema_type, SchemaType::String);
        assert!(spaced.optional);
    }

    #[test]
    fn nested_option_collapses() {
        let mapped = map("Option<Option<i32>>").unwrap();
        assert_eq!(mapped.schema_type, SchemaType::Integer);
        assert!(mapped.optional);
    }

    #[test]
    fn enum_in_scope_is_static() {
        let mut scope = EnumTable::new();
        scope.declare("Units", ["celsius", "fahrenheit"]);
        let mapped = TypeMapper::new(&scope)
            .map(&DeclaredType::parse("Option<Units>"))
            .unwrap();
        assert_eq!(mapped.schema_type, SchemaType::String);
        assert!(mapped.optional);
        assert_eq!(
            mapped.enumeration,
            Some(Enumeration::Cases(vec![
                "celsius".to_string(),
                "fahrenheit".to_string()
            ]))
        );
    }

    #[test]
    fn unknown_name_is_deferred() {
        let mapped = map("weather::Units").unwrap();
        assert_eq!(
            mapped.enumeration,
            Some(Enumeration::Deferred("weather::Units".to_string()))
        );
    }

    #[test]
    fn unsupported_types() {
        for text in [
            "Vec<String>",
            "&str",
            "(i32, i32)",
            "[u8; 4]",
            "char",
            "u128",
            "HashMap<String, i64>",
            "Box<dyn Fn()>",
            "lowercase_thing",
        ] {
            let err = map(text).unwrap_err();
            assert_eq!(err.type_name, DeclaredType::parse(text).to_string(), "{text}");
        }
    }

    #[test]
    fn display_round_trips_compact_text() {
        assert_eq!(
            DeclaredType::parse("Result < Option < u8 > , String >").to_string(),
            "Result<Option<u8>, String>"
        );
        assert_eq!(DeclaredType::parse("& 'a str").to_string(), "&'a str");
    }
}
