//! Path variables extracted from the request path.
//!
//! A [`PathVariables`] is produced by the router when a template such as
//! `/report/{year}/{month}` matches the request path. Values are kept as the raw strings
//! captured from the path; the typed accessors parse them on first use and cache the result.

use crate::error::PathVariableError;
use once_cell::sync::OnceCell;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Immutable set of path variables, in the order they are declared by the template.
///
/// Cloning is cheap and clones share the parsed-value caches.
#[derive(Clone, Default)]
pub struct PathVariables {
    inner: Option<Arc<[PathVariable]>>,
}

struct PathVariable {
    name: String,
    value: String,
    int_value: OnceCell<i32>,
    long_value: OnceCell<i64>,
    double_value: OnceCell<f64>,
}

impl PathVariable {
    fn new(name: String, value: String) -> Self {
        Self { name, value, int_value: OnceCell::new(), long_value: OnceCell::new(), double_value: OnceCell::new() }
    }

    fn parse_cached<T>(&self, cell: &OnceCell<T>, kind: &'static str) -> Result<T, PathVariableError>
    where
        T: FromStr + Copy,
        T::Err: fmt::Display,
    {
        cell.get_or_try_init(|| self.value.parse::<T>())
            .copied()
            .map_err(|e| PathVariableError::parse(&self.name, &self.value, kind, e))
    }
}

impl PathVariables {
    pub const EMPTY: PathVariables = PathVariables { inner: None };

    /// Creates an empty set of path variables.
    #[inline]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Creates path variables from `(name, raw value)` pairs, keeping their order.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let variables = pairs
            .into_iter()
            .map(|(name, value)| PathVariable::new(name.into(), value.into()))
            .collect::<Vec<_>>();

        if variables.is_empty() { Self::empty() } else { Self { inner: Some(variables.into()) } }
    }

    fn variables(&self) -> &[PathVariable] {
        self.inner.as_deref().unwrap_or(&[])
    }

    fn find(&self, name: &str) -> Option<&PathVariable> {
        self.variables().iter().find(|v| v.name == name)
    }

    /// Returns the raw value of the variable, `None` if the template has no such variable.
    #[inline]
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.find(name).map(|v| v.value.as_str())
    }

    /// Returns the variable parsed as an `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`PathVariableError`] when the raw value is not a valid `i32`.
    pub fn get_int(&self, name: &str) -> Result<Option<i32>, PathVariableError> {
        self.find(name).map(|v| v.parse_cached(&v.int_value, "int")).transpose()
    }

    /// Returns the variable parsed as an `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`PathVariableError`] when the raw value is not a valid `i64`.
    pub fn get_long(&self, name: &str) -> Result<Option<i64>, PathVariableError> {
        self.find(name).map(|v| v.parse_cached(&v.long_value, "long")).transpose()
    }

    /// Returns the variable parsed as an `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`PathVariableError`] when the raw value is not a valid `f64`.
    pub fn get_double(&self, name: &str) -> Result<Option<f64>, PathVariableError> {
        self.find(name).map(|v| v.parse_cached(&v.double_value, "double")).transpose()
    }

    #[inline]
    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.variables().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variables().is_empty()
    }

    /// Variable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables().iter().map(|v| v.name.as_str())
    }

    /// `(name, raw value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables().iter().map(|v| (v.name.as_str(), v.value.as_str()))
    }
}

impl fmt::Debug for PathVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::PathVariables;
    use crate::error::PathVariableError;

    fn variables() -> PathVariables {
        PathVariables::from_pairs([("year", "2024"), ("month", "03"), ("ratio", "0.75"), ("name", "march")])
    }

    #[test]
    fn test_empty() {
        let empty = PathVariables::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.get_string("id"), None);
        assert_eq!(empty.get_int("id"), Ok(None));
        assert!(!empty.exists("id"));
        assert!(PathVariables::from_pairs(Vec::<(String, String)>::new()).is_empty());
    }

    #[test]
    fn test_string_access() {
        let variables = variables();
        assert_eq!(variables.len(), 4);
        assert_eq!(variables.get_string("year"), Some("2024"));
        assert_eq!(variables.get_string("name"), Some("march"));
        assert_eq!(variables.get_string("day"), None);
        assert!(variables.exists("month"));
        assert_eq!(variables.names().collect::<Vec<_>>(), vec!["year", "month", "ratio", "name"]);
    }

    #[test]
    fn test_typed_access() {
        let variables = variables();
        assert_eq!(variables.get_int("month"), Ok(Some(3)));
        assert_eq!(variables.get_long("year"), Ok(Some(2024)));
        assert_eq!(variables.get_double("ratio"), Ok(Some(0.75)));
        assert_eq!(variables.get_int("day"), Ok(None));

        // cached value is returned on the second read
        assert_eq!(variables.get_int("month"), Ok(Some(3)));
    }

    #[test]
    fn test_typed_access_parse_error() {
        let variables = variables();

        let err = variables.get_int("name").unwrap_err();
        assert_eq!(err.name(), "name");
        assert!(matches!(err, PathVariableError::Parse { kind: "int", .. }));

        assert!(variables.get_long("ratio").is_err());
        assert!(variables.get_double("name").is_err());

        // a failed parse is not cached as a value
        assert!(variables.get_int("name").is_err());
        // string access never fails
        assert_eq!(variables.get_string("name"), Some("march"));
    }

    #[test]
    fn test_clone_shares_values() {
        let variables = variables();
        let cloned = variables.clone();
        assert_eq!(variables.get_int("month"), Ok(Some(3)));
        assert_eq!(cloned.get_int("month"), Ok(Some(3)));
        assert_eq!(format!("{cloned:?}"), r#"{"year": "2024", "month": "03", "ratio": "0.75", "name": "march"}"#);
    }
}
