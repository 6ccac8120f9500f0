//! Host adapter in the shape of a bundler plugin

use crate::compiler::ComponentCompiler;
use crate::config::PluginConfig;
use crate::error::TransformError;
use crate::filter::{FilterError, PathFilter};
use crate::optimizer::Optimizer;
use crate::pipeline::{self, TransformOutput};

/// Plugin name reported to the host
pub const PLUGIN_NAME: &str = "svg";

/// SVG plugin bound to its configuration and collaborators
///
/// The filter is compiled once at construction. `transform` takes `&self`
/// and holds no mutable state, so one plugin can serve concurrent host tasks
/// when its collaborators are `Sync`.
///
/// # Example
///
/// ```rust
/// use svelte_svg::{CompileOptions, CompileOutput, ComponentCompiler, JsOutput};
/// use svelte_svg::{NoopOptimizer, PluginConfig, SvgPlugin};
///
/// struct Echo;
///
/// impl ComponentCompiler for Echo {
///     fn compile(
///         &self,
///         markup: &str,
///         _: &CompileOptions,
///     ) -> Result<CompileOutput, svelte_svg::error::CollaboratorError> {
///         Ok(CompileOutput {
///             js: JsOutput { code: markup.to_string(), map: serde_json::Value::Null },
///         })
///     }
/// }
///
/// let plugin = SvgPlugin::new(PluginConfig::default(), NoopOptimizer, Echo).unwrap();
/// let out = plugin.transform("<svg></svg>", "icons/a.svg").unwrap().unwrap();
/// assert_eq!(out.code, "<svg {...$$props}></svg>");
/// assert!(plugin.transform("body {}", "style.css").unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct SvgPlugin<O, C> {
    config: PluginConfig,
    filter: PathFilter,
    optimizer: O,
    compiler: C,
}

impl<O, C> SvgPlugin<O, C>
where
    O: Optimizer,
    C: ComponentCompiler,
{
    /// Create a plugin, compiling the include/exclude patterns
    pub fn new(config: PluginConfig, optimizer: O, compiler: C) -> Result<Self, FilterError> {
        let filter = config.filter()?;
        Ok(Self {
            config,
            filter,
            optimizer,
            compiler,
        })
    }

    /// Plugin name reported to the host
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// The configuration the plugin was built with
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Whether `id` would be handled by [`SvgPlugin::transform`]
    pub fn handles(&self, id: &str) -> bool {
        pipeline::is_candidate(&self.filter, id)
    }

    /// Transform hook: `None` leaves the module untouched
    pub fn transform(
        &self,
        source: &str,
        id: &str,
    ) -> Result<Option<TransformOutput>, TransformError> {
        pipeline::transform_with_filter(
            source,
            id,
            &self.config,
            &self.filter,
            &self.optimizer,
            &self.compiler,
        )
    }

    /// The markup that would be handed to the compiler for `source`
    pub fn prepare_markup(&self, source: &str, id: &str) -> Result<String, TransformError> {
        pipeline::prepare_markup(source, id, &self.config, &self.optimizer)
    }
}
