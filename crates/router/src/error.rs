use std::error::Error;
use thiserror::Error;

/// Boxed error returned by request handlers and middlewares.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors raised while registering routes.
///
/// All of them surface during startup, a router is never built from a broken route table.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("illegal path variable {variable}")]
    IllegalPathVariable { variable: String },

    #[error("duplicate path variable {{{name}}} in template {template}")]
    DuplicatePathVariable { name: String, template: String },

    #[error("invalid path template {template}: {source}")]
    InvalidRegex {
        template: String,
        #[source]
        source: regex::Error,
    },

    #[error("router has already been initialized, no more routes can be registered")]
    AlreadyInitialized,
}

impl ConfigError {
    pub fn illegal_path_variable<S: ToString>(variable: S) -> Self {
        Self::IllegalPathVariable { variable: variable.to_string() }
    }

    pub fn duplicate_path_variable<S: ToString, T: ToString>(name: S, template: T) -> Self {
        Self::DuplicatePathVariable { name: name.to_string(), template: template.to_string() }
    }

    pub fn invalid_regex<S: ToString>(template: S, source: regex::Error) -> Self {
        Self::InvalidRegex { template: template.to_string(), source }
    }
}

/// Raised when a path variable is read as a number but its raw value does not parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathVariableError {
    #[error("path variable {name}={value:?} is not a valid {kind}: {reason}")]
    Parse { name: String, value: String, kind: &'static str, reason: String },
}

impl PathVariableError {
    pub fn parse<E: ToString>(name: &str, value: &str, kind: &'static str, reason: E) -> Self {
        Self::Parse { name: name.to_owned(), value: value.to_owned(), kind, reason: reason.to_string() }
    }

    /// The name of the variable that failed to parse.
    pub fn name(&self) -> &str {
        match self {
            Self::Parse { name, .. } => name,
        }
    }
}
