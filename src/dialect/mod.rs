//! Character Page Dialects
//!
//! The character page has been redesigned more than once; the same logical field
//! lives under different markup in each revision. A dialect is picked once per
//! fetched document by probing for a marker element, and the assemblers then read
//! everything through it.

use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

use crate::document::PathSpec;
use crate::error::{LodestoneError, Result};
use crate::model::{ClassProgress, FreeCompanyLink, StatValue};

pub mod classic;
pub mod modern;

pub use classic::Classic;
pub use modern::Modern;

/// Single-step field locations of one page revision.
///
/// Fields that need more than one lookup (class lists, stat grids, equipment)
/// live behind the [`Dialect`] hooks instead.
#[derive(Debug, Clone)]
pub struct FieldTable {
    /// Link back to the profile itself; must contain the requested id.
    pub self_link: PathSpec,
    pub name: PathSpec,
    pub server: PathSpec,
    pub title: PathSpec,
    /// "Race / Clan / Gender" block; the parts are separated by `/` or line breaks.
    pub race_line: PathSpec,
    pub nameday: PathSpec,
    pub guardian: PathSpec,
    pub city_state: PathSpec,
    /// "Company / Rank" text.
    pub grand_company: PathSpec,
    pub introduction: PathSpec,
    pub avatar: PathSpec,
    pub portrait: PathSpec,
    /// Present only on characters with the legacy mark.
    pub legacy_marker: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collectible {
    Minions,
    Mounts,
}

impl Collectible {
    pub fn label(self) -> &'static str {
        match self {
            Collectible::Minions => "Minions",
            Collectible::Mounts => "Mounts",
        }
    }
}

/// One filled gear block as printed: category label plus item name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearEntry {
    pub category: String,
    pub name: String,
}

/// Version-specific mapping of character fields to page structure.
pub trait Dialect: Send + Sync {
    /// Short identifier recorded on parsed profiles (e.g. "classic").
    fn name(&self) -> &'static str;

    /// Returns true if `doc` looks like a page of this revision.
    fn recognizes(&self, doc: &Html) -> bool;

    fn table(&self) -> &FieldTable;

    /// Class/job name to progress. Entries without a name are skipped.
    fn classes(&self, root: ElementRef<'_>) -> BTreeMap<String, ClassProgress>;

    /// Stat name to value. A stat whose value does not parse is left out.
    fn stats(&self, root: ElementRef<'_>) -> BTreeMap<String, StatValue>;

    fn free_company(&self, root: ElementRef<'_>) -> Option<FreeCompanyLink>;

    /// Filled gear blocks in page order.
    fn equipment_layout(&self, root: ElementRef<'_>) -> Vec<GearEntry>;

    /// Collectible names in page order; empty if this revision does not list them.
    fn collectible(&self, root: ElementRef<'_>, kind: Collectible) -> Vec<String>;
}

static DIALECTS: [&(dyn Dialect); 2] = [&Modern, &Classic];

/// Pick the dialect whose marker is present in `doc`.
///
/// A document matching no known revision is not a character page at all (an
/// error page or a redirect to a generic page), so it reports `DoesNotExist`.
pub fn detect(doc: &Html) -> Result<&'static dyn Dialect> {
    DIALECTS
        .iter()
        .copied()
        .find(|d| d.recognizes(doc))
        .ok_or_else(|| LodestoneError::DoesNotExist("unrecognised character page".to_string()))
}

/// Following element siblings of `el`, skipping text nodes.
pub(crate) fn next_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}
