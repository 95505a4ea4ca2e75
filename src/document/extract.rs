//! Field extraction: locate a value by structural path, then coerce it.
//!
//! A [`PathSpec`] starts from an anchor (CSS match, optionally filtered by the
//! element's own text, or a bare text node), walks a list of [`Step`]s, picks one
//! node and reads it. Missing optional fields are `None`, never errors; required
//! fields fail with `FieldNotFound` / `CoercionError` and the assembler decides
//! whether that kills the record.

use ego_tree::NodeRef;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Node};
use std::collections::HashSet;
use tracing::debug;

use super::{normalize_ws, plain_text, selector};
use crate::error::{LodestoneError, Result};
use crate::model::{Gender, Nameday, StatValue};

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"\D").unwrap();
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
    static ref FRACTION: Regex = Regex::new(r"([\d,]+)\s*/\s*([\d,]+)").unwrap();
    static ref PLAIN_NUMBER: Regex = Regex::new(r"^[\d,]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextMatch {
    Exact(&'static str),
    Contains(&'static str),
}

impl TextMatch {
    pub fn matches(&self, text: &str) -> bool {
        let text = normalize_ws(text);
        match self {
            TextMatch::Exact(want) => text == *want,
            TextMatch::Contains(want) => text.contains(want),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    Css {
        selector: &'static str,
        text: Option<TextMatch>,
    },
    Text(TextMatch),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Parent,
    /// Next element sibling; whitespace text in between is skipped.
    NextSibling,
    Select(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pick {
    First,
    Last,
    Nth(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Read {
    Text,
    Attr(&'static str),
    /// Flattened text keeping `<br>` line breaks.
    Lines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    anchor: Anchor,
    steps: Vec<Step>,
    pick: Pick,
    read: Read,
}

impl PathSpec {
    pub fn css(selector: &'static str) -> Self {
        Self::from_anchor(Anchor::Css {
            selector,
            text: None,
        })
    }

    /// Elements matching `selector` whose own text is exactly `text`.
    pub fn css_with_text(selector: &'static str, text: &'static str) -> Self {
        Self::from_anchor(Anchor::Css {
            selector,
            text: Some(TextMatch::Exact(text)),
        })
    }

    /// Text nodes equal to `text` (after whitespace normalisation).
    pub fn text(text: &'static str) -> Self {
        Self::from_anchor(Anchor::Text(TextMatch::Exact(text)))
    }

    /// Text nodes containing `text`.
    pub fn text_containing(text: &'static str) -> Self {
        Self::from_anchor(Anchor::Text(TextMatch::Contains(text)))
    }

    fn from_anchor(anchor: Anchor) -> Self {
        Self {
            anchor,
            steps: Vec::new(),
            pick: Pick::First,
            read: Read::Text,
        }
    }

    pub fn parent(mut self) -> Self {
        self.steps.push(Step::Parent);
        self
    }

    pub fn next_sibling(mut self) -> Self {
        self.steps.push(Step::NextSibling);
        self
    }

    pub fn select(mut self, selector: &'static str) -> Self {
        self.steps.push(Step::Select(selector));
        self
    }

    pub fn last(mut self) -> Self {
        self.pick = Pick::Last;
        self
    }

    pub fn nth(mut self, n: usize) -> Self {
        self.pick = Pick::Nth(n);
        self
    }

    pub fn attr(mut self, name: &'static str) -> Self {
        self.read = Read::Attr(name);
        self
    }

    pub fn lines(mut self) -> Self {
        self.read = Read::Lines;
        self
    }

    /// Every node the path reaches inside `scope`, in document order per anchor.
    pub fn resolve<'a>(&self, scope: ElementRef<'a>) -> Result<Vec<NodeRef<'a, Node>>> {
        let mut nodes: Vec<NodeRef<'a, Node>> = match &self.anchor {
            Anchor::Css { selector: css, text } => {
                let sel = selector(css)?;
                scope
                    .select(&sel)
                    .filter(|el| {
                        text.map_or(true, |m| m.matches(&el.text().collect::<String>()))
                    })
                    .map(|el| *el)
                    .collect()
            }
            Anchor::Text(m) => scope
                .descendants()
                .filter(|n| n.value().as_text().map_or(false, |t| m.matches(t)))
                .collect(),
        };

        for step in &self.steps {
            nodes = match step {
                Step::Parent => dedup(
                    nodes
                        .iter()
                        .filter_map(|n| n.parent())
                        .filter(|n| n.value().is_element()),
                ),
                Step::NextSibling => dedup(
                    nodes
                        .iter()
                        .filter_map(|n| n.next_siblings().find(|s| s.value().is_element())),
                ),
                Step::Select(css) => {
                    let sel = selector(css)?;
                    let mut found = Vec::new();
                    for el in nodes.iter().filter_map(|n| ElementRef::wrap(*n)) {
                        found.extend(el.select(&sel).map(|e| *e));
                    }
                    dedup(found.into_iter())
                }
            };
        }

        Ok(nodes)
    }

    /// Raw value at the picked node, or `None` when nothing matches or it reads empty.
    pub fn read_raw(&self, scope: ElementRef<'_>) -> Result<Option<String>> {
        let nodes = self.resolve(scope)?;
        let node = match self.pick {
            Pick::First => nodes.first(),
            Pick::Last => nodes.last(),
            Pick::Nth(n) => nodes.get(n),
        };
        Ok(node.and_then(|n| self.read_node(*n)))
    }

    fn read_node(&self, node: NodeRef<'_, Node>) -> Option<String> {
        let value = match self.read {
            Read::Text => match ElementRef::wrap(node) {
                Some(el) => normalize_ws(&el.text().collect::<String>()),
                None => normalize_ws(node.value().as_text()?),
            },
            Read::Attr(name) => normalize_ws(ElementRef::wrap(node)?.value().attr(name)?),
            Read::Lines => plain_text(ElementRef::wrap(node)?),
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn dedup<'a>(nodes: impl Iterator<Item = NodeRef<'a, Node>>) -> Vec<NodeRef<'a, Node>> {
    let mut seen = HashSet::new();
    nodes.filter(|n| seen.insert(n.id())).collect()
}

/// Typed interpretation of a normalised raw string.
pub trait Coerce: Sized {
    fn coerce(raw: &str) -> Option<Self>;
}

impl Coerce for String {
    fn coerce(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

fn digits(raw: &str) -> Option<String> {
    let digits = NON_DIGIT.replace_all(raw, "");
    if digits.is_empty() {
        None
    } else {
        Some(digits.into_owned())
    }
}

impl Coerce for u32 {
    fn coerce(raw: &str) -> Option<Self> {
        digits(raw)?.parse().ok()
    }
}

impl Coerce for u64 {
    fn coerce(raw: &str) -> Option<Self> {
        digits(raw)?.parse().ok()
    }
}

impl Coerce for i64 {
    fn coerce(raw: &str) -> Option<Self> {
        digits(raw)?.parse().ok()
    }
}

impl Coerce for Gender {
    fn coerce(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "♂" | "male" => Some(Gender::Male),
            "♀" | "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// An Eorzean moon has 32 suns; there are six named moons of each phase.
const SUNS_PER_MOON: u32 = 32;
const MOONS_PER_PHASE: u32 = 6;

impl Coerce for Nameday {
    /// "15th Sun of the 3rd Astral Moon" -> sun 15, moon 5 (3 * 2 - 1);
    /// umbral moons drop the `- 1`.
    fn coerce(raw: &str) -> Option<Self> {
        let mut numbers = NUMBER
            .find_iter(raw)
            .filter_map(|m| m.as_str().parse::<u32>().ok());
        let sun = numbers.next()?;
        let moon = numbers.next()?;
        if !(1..=SUNS_PER_MOON).contains(&sun) || !(1..=MOONS_PER_PHASE).contains(&moon) {
            return None;
        }
        let umbral = raw.to_lowercase().contains("umbral");
        Some(Nameday {
            sun,
            moon: moon * 2 - if umbral { 0 } else { 1 },
        })
    }
}

impl Coerce for StatValue {
    fn coerce(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if PLAIN_NUMBER.is_match(raw) {
            raw.replace(',', "").parse().ok().map(StatValue::Number)
        } else if raw.is_empty() || raw == "-" {
            None
        } else {
            Some(StatValue::Text(raw.to_string()))
        }
    }
}

/// "1,234 / 5,000" style progress text; a bare "-" means no progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fraction {
    pub current: u64,
    pub total: u64,
}

impl Coerce for Fraction {
    fn coerce(raw: &str) -> Option<Self> {
        if let Some(caps) = FRACTION.captures(raw) {
            let current = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
            let total = caps.get(2)?.as_str().replace(',', "").parse().ok()?;
            return Some(Fraction { current, total });
        }
        if raw.chars().all(|c| c == '-' || c == '/' || c.is_whitespace()) {
            return Some(Fraction::default());
        }
        None
    }
}

/// Field that must be present and well-formed.
pub fn required<T: Coerce>(scope: ElementRef<'_>, field: &str, spec: &PathSpec) -> Result<T> {
    let raw = spec
        .read_raw(scope)?
        .ok_or_else(|| LodestoneError::FieldNotFound(field.to_string()))?;
    T::coerce(&raw).ok_or_else(|| LodestoneError::coercion(field, &raw))
}

/// Best-effort field: absence or a failed coercion yields `None`.
pub fn optional<T: Coerce>(scope: ElementRef<'_>, field: &str, spec: &PathSpec) -> Option<T> {
    match required(scope, field, spec) {
        Ok(value) => Some(value),
        Err(LodestoneError::FieldNotFound(_)) => {
            debug!(field, "optional field not present");
            None
        }
        Err(e) => {
            debug!(field, error = %e, "optional field dropped");
            None
        }
    }
}

/// Every non-empty value the path reaches; the spec's pick is ignored.
pub fn all(scope: ElementRef<'_>, spec: &PathSpec) -> Vec<String> {
    match spec.resolve(scope) {
        Ok(nodes) => nodes.into_iter().filter_map(|n| spec.read_node(n)).collect(),
        Err(e) => {
            debug!(error = %e, "list field dropped");
            Vec::new()
        }
    }
}
