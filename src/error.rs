//! Error taxonomy for a generation run
//!
//! Every failure is fatal to the whole run. The variants mirror the three
//! classes a caller can observe:
//! - configuration problems, reported before any output is produced
//! - I/O problems on a named path (template, allow-list, output file)
//! - template expansion failures naming the template that failed
//!
//! Registry validation failures are kept in their own enum so the registry
//! module stays independent of the rendering stack.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// GENERATION ERRORS
// =============================================================================

/// Errors that abort a generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A required option is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// An input file or directory could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output file or directory could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template failed to parse or referenced a missing field
    #[error("failed to render template `{name}`: {}", render_chain(.source))]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// A typed document could not be serialised
    #[error("failed to serialize {name}: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The registry failed upfront validation
    #[error("invalid registry: {0}")]
    Registry(#[from] RegistryError),

    /// The release archive could not be downloaded for hashing
    #[error("failed to fetch archive {url}: {source}")]
    Archive {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GenerateError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn template(name: impl Into<String>, source: tera::Error) -> Self {
        Self::Template {
            name: name.into(),
            source,
        }
    }

    /// Get the error category for log fields
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenerateError::Config(_) | GenerateError::Registry(_) => ErrorCategory::Configuration,
            GenerateError::Read { .. }
            | GenerateError::Write { .. }
            | GenerateError::Archive { .. } => ErrorCategory::Io,
            GenerateError::Template { .. } | GenerateError::Serialize { .. } => {
                ErrorCategory::Template
            }
        }
    }
}

/// Coarse classification used in structured logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Template,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Template => write!(f, "template"),
        }
    }
}

/// Tera hides the interesting part (the missing variable) in the source chain.
fn render_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Structural problems in a registry, detected before anything is rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry declares no languages")]
    Empty,

    #[error("`{name}` is not a valid identifier ({context})")]
    InvalidIdentifier { name: String, context: String },

    #[error("language `{name}` is declared more than once")]
    DuplicateLanguage { name: String },

    #[error("language `{language}` has invalid directory `{dir}`")]
    InvalidDir { language: String, dir: String },

    #[error("languages `{first}` and `{second}` share the directory `{dir}`")]
    DuplicateDir {
        dir: String,
        first: String,
        second: String,
    },

    #[error("language `{language}` declares rule `{rule}` more than once")]
    DuplicateRule { language: String, rule: String },

    #[error("alias `{alias}` in language `{language}` targets unknown rule `{target}`")]
    DanglingAlias {
        language: String,
        alias: String,
        target: String,
    },

    #[error("alias `{alias}` in language `{language}` shadows a rule of the same name")]
    AliasShadowsRule { language: String, alias: String },

    #[error("flag in `{owner}` has an empty name")]
    EmptyFlagName { owner: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = GenerateError::Config("--dir required".to_string());
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = GenerateError::read("available_tests.txt", io::ErrorKind::NotFound.into());
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("available_tests.txt"));

        let err = GenerateError::from(RegistryError::Empty);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_template_error_names_missing_variable() {
        let source = tera::Tera::one_off("{{ nope }}", &tera::Context::new(), false)
            .expect_err("undefined variable must fail");
        let err = GenerateError::template("cpp_proto_compile.bzl", source);
        let message = err.to_string();
        assert!(message.contains("cpp_proto_compile.bzl"));
        assert!(message.contains("nope"));
    }
}
