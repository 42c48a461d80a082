use crate::error::ConfigError;
use crate::handler::HandlerResult;
use crate::middleware::{Middleware, Next};
use crate::router::pattern::path_segments;
use crate::RequestContext;
use async_trait::async_trait;
use regex::RegexSet;
use std::fmt;

/// Runs a middleware only for requests under one of the given path prefixes; other requests
/// skip it and go straight to the next link.
///
/// A prefix matches the path itself and everything below it: `/api` matches `/api`, `/api/`
/// and `//api//users`, but not `/apis`. Without prefixes every request matches.
pub struct PathFilter<M> {
    prefixes: Option<RegexSet>,
    middleware: M,
}

fn prefix_regex(prefix: &str) -> String {
    let mut regex = String::from("^");
    for (index, segment) in path_segments(prefix).enumerate() {
        regex.push_str(if index == 0 { "/*" } else { "/+" });
        regex.push_str(&regex::escape(segment));
    }
    regex.push_str("(/+.*)?$");
    regex
}

impl<M: Middleware> PathFilter<M> {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if the prefixes cannot be compiled.
    pub fn new<I, S>(prefixes: I, middleware: M) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes.into_iter().map(|prefix| prefix.as_ref().to_owned()).collect::<Vec<_>>();
        if prefixes.is_empty() {
            return Ok(Self { prefixes: None, middleware });
        }

        let regexes = prefixes.iter().map(|prefix| prefix_regex(prefix));
        let set = RegexSet::new(regexes).map_err(|e| ConfigError::invalid_regex(prefixes.join(", "), e))?;
        Ok(Self { prefixes: Some(set), middleware })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.as_ref().is_none_or(|set| set.is_match(path))
    }
}

#[async_trait]
impl<M: Middleware> Middleware for PathFilter<M> {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        if self.matches(req.path()) {
            self.middleware.apply(req, next).await
        } else {
            next.run(req).await
        }
    }
}

impl<M> fmt::Debug for PathFilter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFilter").field("prefixes", &self.prefixes.as_ref().map(RegexSet::patterns)).finish_non_exhaustive()
    }
}
