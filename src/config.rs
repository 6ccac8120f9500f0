//! Plugin configuration
//!
//! Supplied once when the plugin is constructed and read-only afterwards.
//! Can be built in code or loaded from TOML:
//!
//! ```toml
//! include = ["src/icons/**/*.svg"]
//! exclude = ["**/raw/**"]
//! generate = "dom"
//! dev = true
//!
//! [svgo]
//! removeComments = true
//!
//! [compiler]
//! command = ["node", "scripts/compile-svelte.mjs"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::compiler::GenerateMode;
use crate::error::ConfigError;
use crate::filter::{FilterError, PathFilter};
use crate::ident::PathStyle;
use crate::optimizer::OptimizerOptions;

/// Configuration for the transform pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Glob patterns a file must match to be transformed (empty = all)
    pub include: Vec<String>,
    /// Glob patterns that exclude a file
    pub exclude: Vec<String>,
    /// Optimizer options; optimization only runs when this is set
    pub svgo: Option<OptimizerOptions>,
    /// Generation mode forwarded to the compiler
    pub generate: Option<GenerateMode>,
    /// Dev flag forwarded to the compiler
    pub dev: Option<bool>,
    /// Separator style used when deriving component names from paths
    pub path_style: PathStyle,
    /// Directory relative include/exclude patterns are resolved against
    pub root: Option<PathBuf>,
}

impl PluginConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the include patterns
    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the exclude patterns
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Enable optimization with the given options
    pub fn with_svgo(mut self, options: OptimizerOptions) -> Self {
        self.svgo = Some(options);
        self
    }

    /// Set the compiler generation mode
    pub fn with_generate(mut self, generate: GenerateMode) -> Self {
        self.generate = Some(generate);
        self
    }

    /// Set the compiler dev flag
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Set the path separator style
    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.path_style = style;
        self
    }

    /// Set the directory patterns are resolved against
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Compile the include/exclude patterns into a filter
    pub fn filter(&self) -> Result<PathFilter, FilterError> {
        match &self.root {
            Some(root) => PathFilter::with_root(&self.include, &self.exclude, root),
            None => PathFilter::new(&self.include, &self.exclude),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// External command settings for one collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Program and arguments, e.g. `["node", "compile.mjs"]`
    pub command: Vec<String>,
}

/// Configuration file read by the command line tool
///
/// The plugin settings live at the top level; the tool adds the commands
/// used to reach the external optimizer and compiler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolConfig {
    #[serde(flatten)]
    pub plugin: PluginConfig,
    pub compiler: Option<CommandConfig>,
    pub optimizer: Option<CommandConfig>,
}

impl ToolConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
