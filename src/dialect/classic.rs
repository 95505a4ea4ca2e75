//! The original table-based character page (`.player_name_txt` header).

use lazy_static::lazy_static;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use tracing::debug;

use super::{next_elements, Collectible, Dialect, FieldTable, GearEntry};
use crate::document::{self, extract, Coerce, Fraction, PathSpec};
use crate::model::{ClassProgress, FreeCompanyLink, StatValue};

const MARKER: &str = ".player_name_txt";

const ATTRIBUTES: [(&str, &str); 10] = [
    ("hp", ".hp"),
    ("mp", ".mp"),
    ("cp", ".cp"),
    ("tp", ".tp"),
    ("str", ".str"),
    ("dex", ".dex"),
    ("vit", ".vit"),
    ("int", ".int"),
    ("mnd", ".mnd"),
    ("pie", ".pie"),
];

const ELEMENTS: [(&str, &str); 6] = [
    ("fire", ".fire .val"),
    ("ice", ".ice .val"),
    ("wind", ".wind .val"),
    ("earth", ".earth .val"),
    ("thunder", ".thunder .val"),
    ("water", ".water .val"),
];

const PROPERTIES: [&str; 15] = [
    "Defense",
    "Parry",
    "Magic Defense",
    "Attack Power",
    "Skill Speed",
    "Slashing",
    "Piercing",
    "Blunt",
    "Attack Magic Potency",
    "Healing Magic Potency",
    "Spell Speed",
    "Morale",
    "Accuracy",
    "Critical Hit Rate",
    "Determination",
];

lazy_static! {
    static ref TABLE: FieldTable = FieldTable {
        self_link: PathSpec::css(".tab_com_chara_header_profile.tab_left a").attr("href"),
        name: PathSpec::css(".player_name_txt h2 a"),
        server: PathSpec::css(".player_name_txt h2 span"),
        title: PathSpec::css(".chara_title"),
        race_line: PathSpec::css(".chara_profile_title").lines(),
        nameday: PathSpec::text("Nameday")
            .parent()
            .parent()
            .select("td .txt_yellow")
            .last(),
        guardian: PathSpec::text("Guardian")
            .parent()
            .parent()
            .select("td .txt_yellow")
            .last(),
        city_state: PathSpec::text_containing("City-state")
            .parent()
            .select(".txt_yellow"),
        grand_company: PathSpec::text_containing("Grand Company")
            .parent()
            .select(".txt_yellow"),
        introduction: PathSpec::css(".txt_selfintroduction").lines(),
        avatar: PathSpec::css(".player_name_txt .player_name_thumb img").attr("src"),
        portrait: PathSpec::css(".bg_chara_264 img").attr("src"),
        legacy_marker: ".bt_legacy_history",
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classic;

impl Dialect for Classic {
    fn name(&self) -> &'static str {
        "classic"
    }

    fn recognizes(&self, doc: &Html) -> bool {
        document::has_match(doc, MARKER)
    }

    fn table(&self) -> &FieldTable {
        &TABLE
    }

    fn classes(&self, root: ElementRef<'_>) -> BTreeMap<String, ClassProgress> {
        let mut classes = BTreeMap::new();
        let Ok(sel) = document::selector(".class_list .ic_class_wh24_box") else {
            return classes;
        };

        for tag in root.select(&sel) {
            let name = document::normalize_ws(&tag.text().collect::<String>());
            if name.is_empty() {
                continue;
            }

            let mut cells = next_elements(tag);
            let level_text = cells
                .next()
                .map(|c| document::normalize_ws(&c.text().collect::<String>()))
                .unwrap_or_default();
            let progress = match u32::coerce(&level_text) {
                // "-" marks a class that was never taken up
                None => ClassProgress::default(),
                Some(level) => {
                    let exp = cells
                        .next()
                        .and_then(|c| Fraction::coerce(&c.text().collect::<String>()))
                        .unwrap_or_default();
                    ClassProgress {
                        level,
                        exp: exp.current,
                        exp_next: exp.total,
                    }
                }
            };
            classes.insert(name, progress);
        }

        classes
    }

    fn stats(&self, root: ElementRef<'_>) -> BTreeMap<String, StatValue> {
        let mut stats = BTreeMap::new();

        for &(key, css) in ATTRIBUTES.iter().chain(ELEMENTS.iter()) {
            if let Some(v) = extract::optional::<StatValue>(root, key, &PathSpec::css(css)) {
                stats.insert(key.to_string(), v);
            }
        }
        for prop in PROPERTIES {
            let spec = PathSpec::css_with_text(".left", prop)
                .parent()
                .parent()
                .select(".right");
            if let Some(v) = extract::optional::<StatValue>(root, prop, &spec) {
                stats.insert(prop.to_string(), v);
            }
        }

        stats
    }

    fn free_company(&self, root: ElementRef<'_>) -> Option<FreeCompanyLink> {
        let row_sel = document::selector(".chara_profile_list li").ok()?;
        let row = root
            .select(&row_sel)
            .find(|li| li.text().collect::<String>().contains("Free Company"))?;

        let anchor = PathSpec::css("a.txt_yellow");
        let name: String = extract::optional(row, "free_company.name", &anchor)?;
        let href: String =
            extract::optional(row, "free_company.href", &anchor.clone().attr("href"))?;
        let id = document::first_digits(&href)?;
        let crest = extract::all(row, &PathSpec::css(".ic_crest_32 img").attr("src"));

        Some(FreeCompanyLink { id, name, crest })
    }

    fn equipment_layout(&self, root: ElementRef<'_>) -> Vec<GearEntry> {
        let Ok(sel) = document::selector(".item_name_right") else {
            return Vec::new();
        };

        root.select(&sel)
            .filter_map(|block| {
                let name: String =
                    extract::optional(block, "item.name", &PathSpec::css(".item_name"))?;
                let category: String =
                    extract::optional(block, "item.category", &PathSpec::css(".category_name"))
                        .unwrap_or_default();
                Some(GearEntry { category, name })
            })
            .collect()
    }

    fn collectible(&self, root: ElementRef<'_>, kind: Collectible) -> Vec<String> {
        let spec = match kind {
            Collectible::Minions => PathSpec::text("Minions"),
            Collectible::Mounts => PathSpec::text("Mounts"),
        }
        .parent()
        .parent()
        .select("a")
        .attr("title");

        let names = extract::all(root, &spec);
        debug!(kind = kind.label(), count = names.len(), "collectibles");
        names
    }
}
