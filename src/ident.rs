//! Component name derivation from file paths
//!
//! Turns `icons/arrow-left.svg` into `ArrowLeft` so the compiled component
//! can be used as a class name.

use serde::Deserialize;

/// Which directory separator a path uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// Forward slash separated paths
    #[default]
    Posix,
    /// Backslash separated paths
    Windows,
}

impl PathStyle {
    /// The style used by the platform this crate was compiled for
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    /// The separator character for this style
    pub fn separator(self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }
}

/// Derive a component identifier from a file path
///
/// Takes the file name up to its first `.`, upper-cases the first character
/// of every `-` separated segment, joins them and drops every character
/// that cannot start an identifier. Each character is tested on its own, so
/// digits are dropped wherever they appear (`icon-2x.svg` gives `Iconx`).
///
/// The result may be empty; the compiler decides whether to accept it.
///
/// # Example
///
/// ```rust
/// use svelte_svg::{derive_identifier, PathStyle};
///
/// assert_eq!(derive_identifier("a/b/My-Icon.svg", PathStyle::Posix), "MyIcon");
/// assert_eq!(derive_identifier(r"C:\icons\arrow-left.svg", PathStyle::Windows), "ArrowLeft");
/// ```
pub fn derive_identifier(path: &str, style: PathStyle) -> String {
    let file_name = path.rsplit(style.separator()).next().unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();

    stem.split('-')
        .flat_map(capitalize)
        .filter(|c| is_identifier_char(*c))
        .collect()
}

/// Upper-case the first character of a segment, leaving the rest untouched
fn capitalize(segment: &str) -> impl Iterator<Item = char> + '_ {
    let mut chars = segment.chars();
    let first = chars.next();
    first
        .into_iter()
        .flat_map(char::to_uppercase)
        .chain(chars)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenated_name() {
        assert_eq!(derive_identifier("a/b/My-Icon.svg", PathStyle::Posix), "MyIcon");
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(derive_identifier("icon.svg", PathStyle::Posix), "Icon");
    }

    #[test]
    fn test_first_dot_truncates() {
        assert_eq!(
            derive_identifier("src/icons/logo.dark.svg", PathStyle::Posix),
            "Logo"
        );
    }

    #[test]
    fn test_rest_of_segment_is_kept() {
        assert_eq!(
            derive_identifier("/x/arrow-leftUp-BIG.svg", PathStyle::Posix),
            "ArrowLeftUpBIG"
        );
    }

    #[test]
    fn test_repeated_and_edge_hyphens() {
        assert_eq!(derive_identifier("--a--b-.svg", PathStyle::Posix), "AB");
    }

    #[test]
    fn test_invalid_characters_dropped() {
        assert_eq!(
            derive_identifier("icons/user (copy)+x.svg", PathStyle::Posix),
            "Usercopyx"
        );
        assert_eq!(derive_identifier("icons/$price_tag.svg", PathStyle::Posix), "$price_tag");
    }

    #[test]
    fn test_digits_dropped() {
        assert_eq!(derive_identifier("icons/24-px.svg", PathStyle::Posix), "Px");
        assert_eq!(derive_identifier("icons/icon-2x.svg", PathStyle::Posix), "Iconx");
        assert_eq!(derive_identifier("icons/h1.svg", PathStyle::Posix), "H");
        assert_eq!(derive_identifier("icons/404.svg", PathStyle::Posix), "");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(derive_identifier("icons/café-ünïcode.svg", PathStyle::Posix), "Cafncode");
    }

    #[test]
    fn test_empty_result() {
        assert_eq!(derive_identifier("icons/---.svg", PathStyle::Posix), "");
        assert_eq!(derive_identifier("icons/.svg", PathStyle::Posix), "");
        assert_eq!(derive_identifier("", PathStyle::Posix), "");
    }

    #[test]
    fn test_windows_separator() {
        assert_eq!(
            derive_identifier(r"C:\project\icons\close-button.svg", PathStyle::Windows),
            "CloseButton"
        );
    }

    #[test]
    fn test_style_mismatch_keeps_whole_path() {
        // A backslash path read with posix rules has no separator to split on
        assert_eq!(
            derive_identifier(r"icons\close.svg", PathStyle::Posix),
            "Iconsclose"
        );
        // and a slash path read with windows rules keeps its directories
        assert_eq!(
            derive_identifier("icons/close.svg", PathStyle::Windows),
            "Iconsclose"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = derive_identifier("a/b/some-file.svg", PathStyle::Posix);
        let b = derive_identifier("a/b/some-file.svg", PathStyle::Posix);
        assert_eq!(a, b);
    }
}
