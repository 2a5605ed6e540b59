//! Case tables for closed string enumerations.

use indexmap::IndexMap;

/// Named, ordered case lists for closed string enums.
///
/// Used in two roles: as the sibling-declaration scope a [`TypeMapper`](crate::TypeMapper)
/// resolves against, and as the runtime catalog that resolves deferred
/// enumerations at render and dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTable {
    enums: IndexMap<String, Vec<String>>,
}

impl EnumTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enums: IndexMap::new(),
        }
    }

    /// Declares an enum's cases, in declaration order, replacing any earlier
    /// declaration under the same name.
    pub fn declare<I, S>(&mut self, name: impl Into<String>, cases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums
            .insert(name.into(), cases.into_iter().map(Into::into).collect());
        self
    }

    /// Builder form of [`declare`](Self::declare).
    #[must_use]
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(name, cases);
        self
    }

    /// Returns the cases declared under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    /// Returns whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Copies every declaration of `other` into this table.
    pub fn merge(&mut self, other: &EnumTable) {
        for (name, cases) in &other.enums {
            self.enums.insert(name.clone(), cases.clone());
        }
    }

    /// Returns the declared enum names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.enums.keys().map(String::as_str)
    }

    /// Returns the number of declared enums.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enums.len()
    }

    /// Returns `true` when no enum is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}
