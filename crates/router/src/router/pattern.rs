//! Compilation of path templates such as `/users/{id}/items/{propId}-{propType}`.
//!
//! A template is split on `/` into non-empty segments. Inside a segment every `{name}` becomes a
//! capture of one or more non-slash characters, everything else is matched literally. The
//! compiled regex ignores leading, repeated and trailing slashes, so matching a template is
//! equivalent to comparing it with the non-empty segments of the path.

use crate::error::ConfigError;
use crate::PathVariables;
use regex::Regex;
use std::fmt;
use tracing::debug;

const VARIABLE_CAPTURE: &str = "([^/]+)";

/// One non-empty segment of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// matched literally
    Literal(String),
    /// contains at least one variable
    Pattern(String),
}

impl Segment {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Segment::Literal(s) | Segment::Pattern(s) => s,
        }
    }

    pub(crate) fn is_pattern(&self) -> bool {
        matches!(self, Segment::Pattern(_))
    }
}

/// The matchable form of a path template.
#[derive(Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    variable_names: Vec<String>,
    segments: Vec<Segment>,
}

/// Splits a request path into its non-empty segments.
#[inline]
pub(crate) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Appends the regex of one segment, returns whether the segment holds a variable.
fn compile_segment(
    segment: &str,
    template: &str,
    regex: &mut String,
    variable_names: &mut Vec<String>,
) -> Result<bool, ConfigError> {
    let mut rest = segment;
    let mut has_variable = false;

    while let Some(index) = rest.find(['{', '}']) {
        let (literal, tail) = rest.split_at(index);
        if tail.starts_with('}') {
            return Err(ConfigError::illegal_path_variable(segment));
        }

        let close = tail.find('}').ok_or_else(|| ConfigError::illegal_path_variable(tail))?;
        let variable = &tail[..=close];
        let name = &variable[1..close];
        if !is_identifier(name) {
            return Err(ConfigError::illegal_path_variable(variable));
        }
        if variable_names.iter().any(|existing| existing == name) {
            return Err(ConfigError::duplicate_path_variable(name, template));
        }

        regex.push_str(&regex::escape(literal));
        regex.push_str(VARIABLE_CAPTURE);
        variable_names.push(name.to_owned());
        has_variable = true;
        rest = &tail[close + 1..];
    }

    regex.push_str(&regex::escape(rest));
    Ok(has_variable)
}

impl PathPattern {
    /// Compiles `template`.
    ///
    /// Slashes are matched leniently: the leading slash may be missing and runs of slashes count
    /// as one separator, so `/users/{id}` matches `users//42/` as well as `/users/42`. Paths are
    /// compared by their non-empty segments, which is also how the segment tree indexes them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a `{`/`}` does not enclose a valid variable name
    /// (an ASCII letter followed by ASCII letters, digits or `_`), or when a name is repeated.
    pub fn compile(template: &str) -> Result<Self, ConfigError> {
        let mut regex = String::with_capacity(template.len() * 2 + 8);
        let mut variable_names = Vec::new();
        let mut segments = Vec::new();

        regex.push('^');
        for (index, segment) in path_segments(template).enumerate() {
            regex.push_str(if index == 0 { "/*" } else { "/+" });
            if compile_segment(segment, template, &mut regex, &mut variable_names)? {
                segments.push(Segment::Pattern(segment.to_owned()));
            } else {
                segments.push(Segment::Literal(segment.to_owned()));
            }
        }
        regex.push_str("/*$");

        debug!("converted path pattern: {} >>> {}", template, regex);
        let regex = Regex::new(&regex).map_err(|e| ConfigError::invalid_regex(template, e))?;

        Ok(Self { template: template.to_owned(), regex, variable_names, segments })
    }

    /// The template as it was registered.
    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Variable names, left to right.
    #[inline]
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    #[inline]
    pub fn has_variables(&self) -> bool {
        !self.variable_names.is_empty()
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The template with redundant slashes removed; templates with the same key match exactly
    /// the same paths.
    pub(crate) fn normalized(&self) -> String {
        let mut key = String::with_capacity(self.template.len() + 1);
        for segment in &self.segments {
            key.push('/');
            key.push_str(segment.as_str());
        }
        if key.is_empty() {
            key.push('/');
        }
        key
    }

    #[inline]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and binds the captured values to the variable names.
    pub fn captures(&self, path: &str) -> Option<PathVariables> {
        if !self.has_variables() {
            return self.regex.is_match(path).then(PathVariables::empty);
        }

        let captures = self.regex.captures(path)?;
        let values = captures.iter().skip(1).map(|value| value.map_or("", |m| m.as_str()));
        Some(PathVariables::from_pairs(self.variable_names.iter().map(String::as_str).zip(values)))
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("template", &self.template)
            .field("regex", &self.regex.as_str())
            .field("variable_names", &self.variable_names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{path_segments, PathPattern, Segment};
    use crate::error::ConfigError;

    #[test]
    fn test_compile_variables() {
        for template in ["/users/{userId}/items/{propId}-{propType}/", "/users/{userId}/items/{propId}-{propType}"] {
            let pattern = PathPattern::compile(template).unwrap();
            assert_eq!(pattern.variable_names(), ["userId", "propId", "propType"]);

            for path in ["/users/123/items/101-303", "/users/123/items/101-303/", "//users//123/////items//101-303//"] {
                let variables = pattern.captures(path).unwrap();
                assert_eq!(variables.get_string("userId"), Some("123"));
                assert_eq!(variables.get_string("propId"), Some("101"));
                assert_eq!(variables.get_string("propType"), Some("303"));
            }

            assert!(pattern.captures("/nusers/123/items/101-303/").is_none());
            assert!(pattern.captures("/users/123/items/101-303/more").is_none());
        }
    }

    #[test]
    fn test_compile_lenient_slashes() {
        let pattern = PathPattern::compile("/users/{id}").unwrap();
        assert_eq!(pattern.regex().as_str(), "^/*users/+([^/]+)/*$");

        for path in ["users/42", "users//42", "/users/42/", "///users///42///"] {
            assert_eq!(pattern.captures(path).unwrap().get_string("id"), Some("42"), "{path}");
        }
        assert!(!pattern.is_match("/users"));
        assert!(!pattern.is_match("/users//"));
        assert!(!pattern.is_match("/users/42/x"));
    }

    #[test]
    fn test_compile_embedded_variables() {
        let pattern = PathPattern::compile("/images/{name}_{width}x{height}.{type}").unwrap();
        assert_eq!(pattern.regex().as_str(), r"^/*images/+([^/]+)_([^/]+)x([^/]+)\.([^/]+)/*$");
        assert_eq!(pattern.variable_names(), ["name", "width", "height", "type"]);

        let variables = pattern.captures("/images/test_1920x1080.png").unwrap();
        assert_eq!(variables.iter().collect::<Vec<_>>(), [
            ("name", "test"),
            ("width", "1920"),
            ("height", "1080"),
            ("type", "png")
        ]);
        assert!(pattern.captures("/images/error1920x1080.png").is_none());
        assert!(pattern.captures("/noimage/error_1920x1080.png").is_none());
    }

    #[test]
    fn test_compile_literals() {
        let pattern = PathPattern::compile("/static/app.v1.js").unwrap();
        assert!(!pattern.has_variables());
        assert!(pattern.is_match("/static/app.v1.js"));
        assert!(pattern.is_match("/static/app.v1.js/"));
        assert!(pattern.is_match("static//app.v1.js"));
        assert!(!pattern.is_match("/static/appxv1.js"));
        assert!(pattern.captures("/static/app.v1.js").unwrap().is_empty());

        let root = PathPattern::compile("/").unwrap();
        assert_eq!(root.regex().as_str(), "^/*$");
        assert!(root.is_match("/"));
        assert!(root.is_match(""));
        assert!(!root.is_match("/a"));
    }

    #[test]
    fn test_compile_illegal_variables() {
        for (template, variable) in [
            ("/error/{aa$$}/bb", "{aa$$}"),
            ("/error/{1aa}/bb", "{1aa}"),
            ("/error/{}/bb", "{}"),
            ("/error/{a{b}/bb", "{a{b}"),
            ("/error/{_a}/bb", "{_a}"),
            ("/error/{open/bb", "{open"),
        ] {
            match PathPattern::compile(template) {
                Err(ConfigError::IllegalPathVariable { variable: actual }) => assert_eq!(actual, variable),
                other => panic!("expected illegal path variable for {template}, got {other:?}"),
            }
        }

        assert!(matches!(PathPattern::compile("/error/a}b"), Err(ConfigError::IllegalPathVariable { .. })));
        assert!(matches!(
            PathPattern::compile("/users/{id}/friends/{id}"),
            Err(ConfigError::DuplicatePathVariable { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_segments_and_normalized() {
        let pattern = PathPattern::compile("users//{id}/profile/").unwrap();
        assert_eq!(pattern.segments(), [
            Segment::Literal("users".into()),
            Segment::Pattern("{id}".into()),
            Segment::Literal("profile".into())
        ]);
        assert_eq!(pattern.normalized(), "/users/{id}/profile");
        assert_eq!(PathPattern::compile("//").unwrap().normalized(), "/");
        assert_eq!(path_segments("//a///b/").collect::<Vec<_>>(), ["a", "b"]);
    }
}
