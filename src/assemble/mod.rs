//! Record Assemblers
//!
//! Each assembler turns one fetched page body into a typed record (or a list of
//! entries for paginated pages). They are plain synchronous functions over `&str`:
//! the parsed tree never outlives the call, so nothing here is held across an
//! await point in the client.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::ElementRef;

use crate::document;

pub mod achievements;
pub mod character;
pub mod free_company;
pub mod search;
pub mod topics;

lazy_static! {
    /// Timestamps are rendered client-side: `ldst_strftime(1377000000, 'YMD')`.
    static ref STRFTIME: Regex = Regex::new(r"ldst_strftime\((\d+),").unwrap();
}

/// Unix seconds from the first `ldst_strftime(...)` call inside `scope`'s scripts.
pub(crate) fn script_timestamp(scope: ElementRef<'_>) -> Option<i64> {
    scripts(scope).iter().find_map(|text| {
        STRFTIME
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// Text of every `<script>` under `scope`, in document order.
pub(crate) fn scripts(scope: ElementRef<'_>) -> Vec<String> {
    match document::selector("script") {
        Ok(sel) => scope.select(&sel).map(|s| s.text().collect()).collect(),
        Err(_) => Vec::new(),
    }
}

/// "(Gilgamesh)" or "Gilgamesh [Aether]" to "Gilgamesh".
pub(crate) fn world_name(raw: &str) -> String {
    let head = raw.split('[').next().unwrap_or(raw);
    head.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .to_string()
}

/// Drop one layer of wrapping punctuation: "(Allied)", "«TAG»", "<Sworn>".
pub(crate) fn unwrap_brackets(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(|c| matches!(c, '(' | '<' | '[' | '«'))
        .trim_end_matches(|c| matches!(c, ')' | '>' | ']' | '»'))
        .trim()
        .to_string()
}
