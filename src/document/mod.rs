//! Parsed-page helpers shared by the dialects and record assemblers.

use scraper::{Html, Selector};

use crate::error::{LodestoneError, Result};

pub mod extract;
pub mod unwrap;

pub use extract::{Anchor, Coerce, Fraction, PathSpec, Pick, Read, Step, TextMatch};
pub use unwrap::{plain_text, unwrap_tags, Rewriter};

pub fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| LodestoneError::InvalidSelector(format!("{}: {:?}", css, e)))
}

/// True if anything in the document matches `css`.
pub fn has_match(doc: &Html, css: &str) -> bool {
    selector(css)
        .map(|sel| doc.select(&sel).next().is_some())
        .unwrap_or(false)
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Last run of ASCII digits in `s` (ids sit at the end of Lodestone paths).
pub fn last_digits(s: &str) -> Option<String> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .last()
        .map(str::to_string)
}

/// First run of ASCII digits in `s`.
pub fn first_digits(s: &str) -> Option<String> {
    s.split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .map(str::to_string)
}
