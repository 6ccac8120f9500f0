//! Component compiler interface
//!
//! Compiling component markup to JavaScript is done by an external compiler.
//! These types describe what it is asked for and what it hands back.

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Module format of the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Esm,
}

/// Which kind of code the compiler generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateMode {
    /// Client-side DOM code
    Dom,
    /// Server-side rendering code
    Ssr,
}

impl std::str::FromStr for GenerateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dom" => Ok(GenerateMode::Dom),
            "ssr" => Ok(GenerateMode::Ssr),
            other => Err(format!("unknown generate mode '{}' (expected dom or ssr)", other)),
        }
    }
}

/// Options passed to the compiler for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Source path, used by the compiler for diagnostics
    pub filename: String,
    /// Component class name
    pub name: String,
    pub format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateMode>,
    pub hydratable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev: Option<bool>,
}

impl CompileOptions {
    /// Options for a component compiled from `filename` under the class name `name`
    ///
    /// The format is fixed to ES modules and hydration is always enabled.
    pub fn new(filename: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            name: name.into(),
            format: OutputFormat::Esm,
            generate: None,
            hydratable: true,
            dev: None,
        }
    }

    pub fn with_generate(mut self, generate: Option<GenerateMode>) -> Self {
        self.generate = generate;
        self
    }

    pub fn with_dev(mut self, dev: Option<bool>) -> Self {
        self.dev = dev;
        self
    }
}

/// Generated JavaScript and its source map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsOutput {
    pub code: String,
    #[serde(default)]
    pub map: serde_json::Value,
}

/// Everything the compiler returns; only the `js` part is consumed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOutput {
    pub js: JsOutput,
}

/// A compiler turning component markup into JavaScript
pub trait ComponentCompiler {
    fn compile(
        &self,
        markup: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CollaboratorError>;
}

impl<T: ComponentCompiler + ?Sized> ComponentCompiler for &T {
    fn compile(
        &self,
        markup: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CollaboratorError> {
        (**self).compile(markup, options)
    }
}

impl<T: ComponentCompiler + ?Sized> ComponentCompiler for Box<T> {
    fn compile(
        &self,
        markup: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CollaboratorError> {
        (**self).compile(markup, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = CompileOptions::new("icons/a.svg", "A");
        assert_eq!(options.format, OutputFormat::Esm);
        assert!(options.hydratable);
        assert_eq!(options.generate, None);
        assert_eq!(options.dev, None);
    }

    #[test]
    fn test_serialize_omits_unset_fields() {
        let options = CompileOptions::new("icons/a.svg", "A");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "filename": "icons/a.svg",
                "name": "A",
                "format": "esm",
                "hydratable": true,
            })
        );
    }

    #[test]
    fn test_serialize_full() {
        let options = CompileOptions::new("icons/a.svg", "A")
            .with_generate(Some(GenerateMode::Ssr))
            .with_dev(Some(true));
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "filename": "icons/a.svg",
                "name": "A",
                "format": "esm",
                "generate": "ssr",
                "hydratable": true,
                "dev": true,
            })
        );
    }

    #[test]
    fn test_parse_generate_mode() {
        assert_eq!("dom".parse::<GenerateMode>(), Ok(GenerateMode::Dom));
        assert_eq!("ssr".parse::<GenerateMode>(), Ok(GenerateMode::Ssr));
        assert!("DOM".parse::<GenerateMode>().is_err());
    }

    #[test]
    fn test_output_ignores_extra_fields() {
        let output: CompileOutput = serde_json::from_value(json!({
            "js": { "code": "export default 1;", "map": { "version": 3 } },
            "css": { "code": null },
            "warnings": []
        }))
        .unwrap();
        assert_eq!(output.js.code, "export default 1;");
        assert_eq!(output.js.map, json!({ "version": 3 }));
    }
}
