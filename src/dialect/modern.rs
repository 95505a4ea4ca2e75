//! The redesigned character page (`.frame__chara` header, `character-block` profile).

use lazy_static::lazy_static;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use tracing::debug;

use super::{Collectible, Dialect, FieldTable, GearEntry};
use crate::document::{self, extract, Coerce, PathSpec};
use crate::model::{ClassProgress, FreeCompanyLink, StatValue};

const MARKER: &str = ".frame__chara__name";

/// Printed parameter names mapped onto the short keys the older page used.
const PARAM_KEYS: [(&str, &str); 11] = [
    ("HP", "hp"),
    ("MP", "mp"),
    ("CP", "cp"),
    ("GP", "gp"),
    ("TP", "tp"),
    ("Strength", "str"),
    ("Dexterity", "dex"),
    ("Vitality", "vit"),
    ("Intelligence", "int"),
    ("Mind", "mnd"),
    ("Piety", "pie"),
];

lazy_static! {
    static ref TABLE: FieldTable = FieldTable {
        self_link: PathSpec::css(".frame__chara__link").attr("href"),
        name: PathSpec::css(".frame__chara__name"),
        server: PathSpec::css(".frame__chara__world"),
        title: PathSpec::css(".frame__chara__title"),
        race_line: PathSpec::text("Race/Clan/Gender")
            .parent()
            .next_sibling()
            .lines(),
        nameday: PathSpec::css(".character-block__birth"),
        guardian: PathSpec::text("Guardian").parent().next_sibling(),
        city_state: PathSpec::text("City-state").parent().next_sibling(),
        grand_company: PathSpec::text("Grand Company").parent().next_sibling(),
        introduction: PathSpec::css(".character__selfintroduction").lines(),
        avatar: PathSpec::css(".frame__chara__face img").attr("src"),
        portrait: PathSpec::css(".character__detail__image img").attr("src"),
        legacy_marker: ".character__legacy",
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Modern;

impl Dialect for Modern {
    fn name(&self) -> &'static str {
        "modern"
    }

    fn recognizes(&self, doc: &Html) -> bool {
        document::has_match(doc, MARKER)
    }

    fn table(&self) -> &FieldTable {
        &TABLE
    }

    fn classes(&self, root: ElementRef<'_>) -> BTreeMap<String, ClassProgress> {
        let mut classes = BTreeMap::new();
        let Ok(sel) = document::selector(".character__level__list li") else {
            return classes;
        };
        let icon = PathSpec::css("img").attr("data-tooltip");

        for item in root.select(&sel) {
            let Some(name) = extract::optional::<String>(item, "class.name", &icon) else {
                continue;
            };
            let level = u32::coerce(&item.text().collect::<String>()).unwrap_or(0);
            // Experience is only printed for the active job on this layout.
            classes.insert(
                name,
                ClassProgress {
                    level,
                    ..ClassProgress::default()
                },
            );
        }

        classes
    }

    fn stats(&self, root: ElementRef<'_>) -> BTreeMap<String, StatValue> {
        let mut stats = BTreeMap::new();
        let Ok(sel) = document::selector(".character__param__list tr") else {
            return stats;
        };
        let label = PathSpec::css("th");
        let value = PathSpec::css("td");

        for row in root.select(&sel) {
            let Some(name) = extract::optional::<String>(row, "param.name", &label) else {
                continue;
            };
            let Some(v) = extract::optional::<StatValue>(row, &name, &value) else {
                continue;
            };
            let key = PARAM_KEYS
                .iter()
                .find(|(printed, _)| *printed == name)
                .map(|(_, key)| key.to_string())
                .unwrap_or(name);
            stats.insert(key, v);
        }

        stats
    }

    fn free_company(&self, root: ElementRef<'_>) -> Option<FreeCompanyLink> {
        let anchor = PathSpec::css(".character__freecompany__name h4 a");
        let name: String = extract::optional(root, "free_company.name", &anchor)?;
        let href: String =
            extract::optional(root, "free_company.href", &anchor.clone().attr("href"))?;
        let id = document::first_digits(&href)?;
        let crest = extract::all(
            root,
            &PathSpec::css(".character__freecompany__crest__image img").attr("src"),
        );

        Some(FreeCompanyLink { id, name, crest })
    }

    fn equipment_layout(&self, root: ElementRef<'_>) -> Vec<GearEntry> {
        let Ok(sel) = document::selector(".item_detail_box") else {
            return Vec::new();
        };
        let name = PathSpec::css(".db-tooltip__item__name");
        let category = PathSpec::css(".db-tooltip__item__category");

        root.select(&sel)
            .filter_map(|block| {
                Some(GearEntry {
                    name: extract::optional(block, "item.name", &name)?,
                    category: extract::optional(block, "item.category", &category)
                        .unwrap_or_default(),
                })
            })
            .collect()
    }

    fn collectible(&self, _root: ElementRef<'_>, kind: Collectible) -> Vec<String> {
        // Minions and mounts moved to their own pages in this revision.
        debug!(kind = kind.label(), "collectibles not listed on profile page");
        Vec::new()
    }
}
