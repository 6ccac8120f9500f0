//! svelte-svg - compile SVG files into Svelte components
//!
//! A build-time transform: SVG files matching a filter are optionally
//! decoded from a data-URI export, optionally optimized, get a props spread
//! injected into their root tag and are handed to an external component
//! compiler.
//!
//! # Example
//!
//! ```rust
//! use svelte_svg::{derive_identifier, markup::inject_spread_props, PathStyle};
//!
//! assert_eq!(derive_identifier("icons/arrow-left.svg", PathStyle::Posix), "ArrowLeft");
//!
//! let markup = inject_spread_props(r#"<svg width="10"><path/></svg>"#).unwrap();
//! assert_eq!(markup, r#"<svg width="10" {...$$props}><path/></svg>"#);
//! ```

pub mod command;
pub mod compiler;
pub mod config;
pub mod datauri;
pub mod error;
pub mod filter;
pub mod ident;
pub mod logging;
pub mod markup;
pub mod optimizer;
pub mod pipeline;
pub mod plugin;

pub use command::{CommandCompiler, CommandError, CommandOptimizer, ExternalCommand};
pub use compiler::{
    CompileOptions, CompileOutput, ComponentCompiler, GenerateMode, JsOutput, OutputFormat,
};
pub use config::{CommandConfig, PluginConfig, ToolConfig};
pub use error::{ConfigError, PipelineError, TransformError};
pub use filter::{FilterError, PathFilter};
pub use ident::{derive_identifier, PathStyle};
pub use optimizer::{Minifier, NoopOptimizer, Optimized, Optimizer, OptimizerOptions};
pub use pipeline::{prepare_markup, transform, TransformOutput};
pub use plugin::SvgPlugin;
