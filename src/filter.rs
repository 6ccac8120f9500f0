//! Include/exclude path filtering
//!
//! Mirrors the `createFilter` helper bundler plugins use: excludes win,
//! then any include accepts, and an empty include list accepts everything.
//!
//! Patterns use `glob` syntax, which has no brace alternation. A pattern such
//! as `**/*.{svg,svgz}` is rejected rather than matched literally; list the
//! alternatives as separate patterns instead.

use std::path::Path;

use glob::{MatchOptions, Pattern, PatternError};
use thiserror::Error;

/// Errors that can occur when building a filter
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("brace alternation is not supported in '{pattern}'; use one pattern per alternative")]
    UnsupportedBraces { pattern: String },
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Predicate over module ids built from glob patterns
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    /// Build a filter with patterns matched against ids as written
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self::build(include, exclude, None)
    }

    /// Build a filter whose relative patterns are resolved against `root`
    pub fn with_root<I, E>(include: I, exclude: E, root: &Path) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self::build(include, exclude, Some(root))
    }

    fn build<I, E>(include: I, exclude: E, root: Option<&Path>) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let compile = |pattern: &str| -> Result<Pattern, FilterError> {
            if pattern.contains('{') {
                return Err(FilterError::UnsupportedBraces {
                    pattern: pattern.to_string(),
                });
            }
            let resolved = resolve_pattern(pattern, root);
            Pattern::new(&resolved).map_err(|source| FilterError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
        };

        let include = include
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude = exclude
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { include, exclude })
    }

    /// Check whether a module id passes the filter
    pub fn matches(&self, id: &str) -> bool {
        // Virtual module ids carry a NUL prefix and are never real files
        if id.contains('\0') {
            return false;
        }

        let id = normalize(id);

        if self
            .exclude
            .iter()
            .any(|p| p.matches_with(&id, MATCH_OPTIONS))
        {
            return false;
        }

        if self
            .include
            .iter()
            .any(|p| p.matches_with(&id, MATCH_OPTIONS))
        {
            return true;
        }

        self.include.is_empty()
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

fn resolve_pattern(pattern: &str, root: Option<&Path>) -> String {
    let normalized = normalize(pattern);
    match root {
        Some(root) if !is_absolute(&normalized) => {
            let root = normalize(&root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), normalized)
        }
        _ => normalized,
    }
}

fn is_absolute(pattern: &str) -> bool {
    pattern.starts_with('/') || pattern.as_bytes().get(1) == Some(&b':')
}
