//! SVG to component transform pipeline
//!
//! One call per candidate file, in this order:
//!
//! 1. gate on the include/exclude filter and the `.svg` extension
//! 2. unwrap a data-URI export left behind by an earlier asset plugin
//! 3. optimize, when optimizer options are configured
//! 4. inject the props spread into the root `<svg>` tag
//! 5. compile with the external component compiler
//!
//! Every step is a pure function of its inputs; nothing is cached between calls.

use std::path::Path;

use tracing::{debug, trace};

use crate::compiler::{CompileOptions, ComponentCompiler};
use crate::config::PluginConfig;
use crate::datauri::{is_data_uri_export, unwrap_data_uri_export};
use crate::error::{PipelineError, TransformError};
use crate::filter::PathFilter;
use crate::ident::derive_identifier;
use crate::markup::inject_spread_props;
use crate::optimizer::Optimizer;

/// Generated module handed back to the host
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub code: String,
    pub map: serde_json::Value,
}

/// Whether a file has exactly the `.svg` extension
///
/// The comparison is case-sensitive: `icon.SVG` is not a candidate.
pub fn has_svg_extension(path: &str) -> bool {
    Path::new(path).extension().is_some_and(|ext| ext == "svg")
}

/// Whether the pipeline handles `path` at all
pub fn is_candidate(filter: &PathFilter, path: &str) -> bool {
    filter.matches(path) && has_svg_extension(path)
}

/// Transform one file, building the filter from `config`
///
/// Returns `Ok(None)` when the file is not handled and should pass through
/// unchanged. Hosts transforming many files should build the filter once and
/// use [`transform_with_filter`] or [`crate::SvgPlugin`].
pub fn transform<O, C>(
    source: &str,
    path: &str,
    config: &PluginConfig,
    optimizer: &O,
    compiler: &C,
) -> Result<Option<TransformOutput>, PipelineError>
where
    O: Optimizer + ?Sized,
    C: ComponentCompiler + ?Sized,
{
    let filter = config.filter()?;
    Ok(transform_with_filter(
        source, path, config, &filter, optimizer, compiler,
    )?)
}

/// Transform one file with an already compiled filter
pub fn transform_with_filter<O, C>(
    source: &str,
    path: &str,
    config: &PluginConfig,
    filter: &PathFilter,
    optimizer: &O,
    compiler: &C,
) -> Result<Option<TransformOutput>, TransformError>
where
    O: Optimizer + ?Sized,
    C: ComponentCompiler + ?Sized,
{
    if !is_candidate(filter, path) {
        debug!(path, "skipping file outside filter");
        return Ok(None);
    }

    let markup = prepare_markup(source, path, config, optimizer)?;
    let name = derive_identifier(path, config.path_style);

    let options = CompileOptions::new(path, name)
        .with_generate(config.generate)
        .with_dev(config.dev);

    debug!(path, name = %options.name, "compiling component");
    let output = compiler
        .compile(&markup, &options)
        .map_err(TransformError::Compiler)?;

    Ok(Some(TransformOutput {
        code: output.js.code,
        map: output.js.map,
    }))
}

/// Run the decode, optimize and rewrite steps and return the markup the
/// compiler would receive
///
/// Does not check the filter or the extension.
pub fn prepare_markup<O>(
    source: &str,
    path: &str,
    config: &PluginConfig,
    optimizer: &O,
) -> Result<String, TransformError>
where
    O: Optimizer + ?Sized,
{
    let mut source = source.to_string();

    if is_data_uri_export(&source) {
        debug!(path, "unwrapping data URI export");
        source = unwrap_data_uri_export(&source).map_err(|e| TransformError::DataUri {
            path: path.to_string(),
            source: e,
        })?;
    }

    if let Some(options) = &config.svgo {
        debug!(path, bytes = source.len(), "optimizing markup");
        source = optimizer
            .optimize(&source, options)
            .map_err(TransformError::Optimizer)?
            .data;
    }

    let markup = inject_spread_props(&source).ok_or_else(|| TransformError::MissingSvgRoot {
        path: path.to_string(),
    })?;
    trace!(path, %markup, "rewrote root tag");

    Ok(markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOutput, JsOutput};
    use crate::error::CollaboratorError;
    use crate::optimizer::{NoopOptimizer, Optimized, OptimizerOptions};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Compiler that records its inputs and echoes the markup as code
    #[derive(Default)]
    struct EchoCompiler {
        calls: RefCell<Vec<(String, CompileOptions)>>,
    }

    impl ComponentCompiler for EchoCompiler {
        fn compile(
            &self,
            markup: &str,
            options: &CompileOptions,
        ) -> Result<CompileOutput, CollaboratorError> {
            self.calls
                .borrow_mut()
                .push((markup.to_string(), options.clone()));
            Ok(CompileOutput {
                js: JsOutput {
                    code: markup.to_string(),
                    map: serde_json::json!({ "version": 3 }),
                },
            })
        }
    }

    struct ShortenWidthOptimizer;

    impl Optimizer for ShortenWidthOptimizer {
        fn optimize(
            &self,
            source: &str,
            _: &OptimizerOptions,
        ) -> Result<Optimized, CollaboratorError> {
            Ok(Optimized {
                data: source.replace("width", "w"),
            })
        }
    }

    #[test]
    fn test_extension_check() {
        assert!(has_svg_extension("a/b/icon.svg"));
        assert!(!has_svg_extension("a/b/icon.SVG"));
        assert!(!has_svg_extension("a/b/icon.svgz"));
        assert!(!has_svg_extension("a/b/icon"));
        assert!(!has_svg_extension("a/b/icon.svg.js"));
    }

    #[test]
    fn test_transform_simple() {
        let compiler = EchoCompiler::default();
        let out = transform(
            r#"<svg width="10"><path/></svg>"#,
            "src/icons/my-icon.svg",
            &PluginConfig::default(),
            &NoopOptimizer,
            &compiler,
        )
        .unwrap()
        .unwrap();

        assert_eq!(out.code, r#"<svg width="10" {...$$props}><path/></svg>"#);
        assert_eq!(out.map, serde_json::json!({ "version": 3 }));

        let calls = compiler.calls.borrow();
        assert_eq!(calls.len(), 1);
        let options = &calls[0].1;
        assert_eq!(options.name, "MyIcon");
        assert_eq!(options.filename, "src/icons/my-icon.svg");
        assert!(options.hydratable);
    }

    #[test]
    fn test_non_svg_skipped_without_compiling() {
        let compiler = EchoCompiler::default();
        let out = transform(
            "<svg/>",
            "src/icon.png",
            &PluginConfig::default(),
            &NoopOptimizer,
            &compiler,
        )
        .unwrap();
        assert_eq!(out, None);
        assert!(compiler.calls.borrow().is_empty());
    }

    #[test]
    fn test_filtered_out_skipped_even_when_malformed() {
        let compiler = EchoCompiler::default();
        let config = PluginConfig::new().with_exclude(["**/raw/**"]);
        let out = transform(
            "not even markup",
            "src/raw/icon.svg",
            &config,
            &NoopOptimizer,
            &compiler,
        )
        .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_optimizer_only_runs_when_configured() {
        let source = r#"<svg width="1"/>"#;

        let plain = prepare_markup(source, "a.svg", &PluginConfig::default(), &ShortenWidthOptimizer)
            .unwrap();
        assert_eq!(plain, r#"<svg width="1"/ {...$$props}>"#);

        let config = PluginConfig::new().with_svgo(OptimizerOptions::new());
        let optimized = prepare_markup(source, "a.svg", &config, &ShortenWidthOptimizer).unwrap();
        assert_eq!(optimized, r#"<svg w="1"/ {...$$props}>"#);
    }

    #[test]
    fn test_data_uri_unwrapped_before_rewrite() {
        let source = r#"export default "data:image/svg+xml,%3Csvg%20width%3D%2210%22%3E%3Cpath%2F%3E%3C%2Fsvg%3E""#;
        let markup =
            prepare_markup(source, "a.svg", &PluginConfig::default(), &NoopOptimizer).unwrap();
        assert_eq!(markup, r#"<svg width="10" {...$$props}><path/></svg>"#);
    }

    #[test]
    fn test_malformed_data_uri_stops_before_compile() {
        let compiler = EchoCompiler::default();
        let source = r#"export default "data:image/svg+xml,%3Csvg%3E50%zz%3C%2Fsvg%3E""#;
        let err = transform(
            source,
            "a.svg",
            &PluginConfig::default(),
            &NoopOptimizer,
            &compiler,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transform(TransformError::DataUri { .. })
        ));
        assert!(compiler.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_root_is_error() {
        let compiler = EchoCompiler::default();
        let err = transform(
            "<div>not svg</div>",
            "a.svg",
            &PluginConfig::default(),
            &NoopOptimizer,
            &compiler,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transform(TransformError::MissingSvgRoot { .. })
        ));
        assert!(compiler.calls.borrow().is_empty());
    }

    #[test]
    fn test_generate_and_dev_forwarded() {
        let compiler = EchoCompiler::default();
        let config = PluginConfig::new()
            .with_generate(crate::compiler::GenerateMode::Ssr)
            .with_dev(true);
        transform("<svg/>", "x/close.svg", &config, &NoopOptimizer, &compiler).unwrap();

        let calls = compiler.calls.borrow();
        assert_eq!(calls[0].1.generate, Some(crate::compiler::GenerateMode::Ssr));
        assert_eq!(calls[0].1.dev, Some(true));
    }

    #[test]
    fn test_invalid_filter_is_error() {
        let config = PluginConfig::new().with_include(["[broken"]);
        let err = transform(
            "<svg/>",
            "a.svg",
            &config,
            &NoopOptimizer,
            &EchoCompiler::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Filter(_)));
    }
}
