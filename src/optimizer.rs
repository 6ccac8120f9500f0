//! Markup size optimization
//!
//! The pipeline only knows the [`Optimizer`] trait. A real deployment plugs in
//! an external tool through [`crate::command::CommandOptimizer`]; [`Minifier`]
//! is a small in-process fallback that needs nothing installed.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Options handed to the optimizer untouched
pub type OptimizerOptions = serde_json::Map<String, serde_json::Value>;

/// Result of an optimization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimized {
    /// Optimized markup
    pub data: String,
}

/// A markup-size optimizer
pub trait Optimizer {
    fn optimize(
        &self,
        source: &str,
        options: &OptimizerOptions,
    ) -> Result<Optimized, CollaboratorError>;
}

impl<T: Optimizer + ?Sized> Optimizer for &T {
    fn optimize(
        &self,
        source: &str,
        options: &OptimizerOptions,
    ) -> Result<Optimized, CollaboratorError> {
        (**self).optimize(source, options)
    }
}

impl<T: Optimizer + ?Sized> Optimizer for Box<T> {
    fn optimize(
        &self,
        source: &str,
        options: &OptimizerOptions,
    ) -> Result<Optimized, CollaboratorError> {
        (**self).optimize(source, options)
    }
}

/// Optimizer that returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOptimizer;

impl Optimizer for NoopOptimizer {
    fn optimize(&self, source: &str, _: &OptimizerOptions) -> Result<Optimized, CollaboratorError> {
        Ok(Optimized {
            data: source.to_string(),
        })
    }
}

/// In-process minifier covering the cheapest size wins
///
/// Recognized boolean options, all enabled unless set to `false`:
/// `removeXMLProcInst`, `removeDoctype`, `removeComments`, `collapseWhitespace`.
/// Other keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minifier;

/// Which passes the minifier runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MinifyPasses {
    xml_proc_inst: bool,
    doctype: bool,
    comments: bool,
    whitespace: bool,
}

impl MinifyPasses {
    fn from_options(options: &OptimizerOptions) -> Self {
        let enabled = |key: &str| options.get(key).and_then(|v| v.as_bool()).unwrap_or(true);
        Self {
            xml_proc_inst: enabled("removeXMLProcInst"),
            doctype: enabled("removeDoctype"),
            comments: enabled("removeComments"),
            whitespace: enabled("collapseWhitespace"),
        }
    }
}

fn xml_proc_inst() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<\?xml.*?\?>").expect("xml declaration pattern is valid"))
}

fn doctype() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<!DOCTYPE[^\[>]*(\[.*?\])?\s*>").expect("doctype pattern is valid")
    })
}

fn comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"))
}

fn inter_tag_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s+<").expect("whitespace pattern is valid"))
}

impl Optimizer for Minifier {
    fn optimize(
        &self,
        source: &str,
        options: &OptimizerOptions,
    ) -> Result<Optimized, CollaboratorError> {
        let passes = MinifyPasses::from_options(options);
        let mut data = source.to_string();

        if passes.xml_proc_inst {
            data = xml_proc_inst().replace_all(&data, "").into_owned();
        }
        if passes.doctype {
            data = doctype().replace_all(&data, "").into_owned();
        }
        if passes.comments {
            data = comment().replace_all(&data, "").into_owned();
        }
        if passes.whitespace {
            data = inter_tag_whitespace().replace_all(&data, "><").into_owned();
            data = data.trim().to_string();
        }

        Ok(Optimized { data })
    }
}
