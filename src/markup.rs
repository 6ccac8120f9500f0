//! Root `<svg>` tag rewriting
//!
//! The generated component forwards its props onto the root element, which
//! needs a spread attribute inside the opening tag.

use std::sync::OnceLock;

use regex::Regex;

/// Attribute injected into the root tag so component props reach the `<svg>` element
pub const SPREAD_PROPS: &str = "{...$$props}";

fn svg_root() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)(<svg.*?)(>.*)").expect("svg root pattern is valid"))
}

/// Inject the props spread before the first `>` of the first `<svg` tag
///
/// Returns `None` when the markup has no `<svg` opening tag. Anything before
/// that tag (XML declaration, doctype, comments) is not part of the result.
///
/// # Example
///
/// ```rust
/// use svelte_svg::markup::inject_spread_props;
///
/// let out = inject_spread_props(r#"<svg width="10"><path/></svg>"#).unwrap();
/// assert_eq!(out, r#"<svg width="10" {...$$props}><path/></svg>"#);
/// ```
pub fn inject_spread_props(markup: &str) -> Option<String> {
    let caps = svg_root().captures(markup)?;
    let start = &caps[1];
    let body = &caps[2];

    let mut out = String::with_capacity(start.len() + SPREAD_PROPS.len() + body.len() + 1);
    out.push_str(start);
    out.push(' ');
    out.push_str(SPREAD_PROPS);
    out.push_str(body);
    Some(out)
}
