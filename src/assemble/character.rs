//! Character profile assembly.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};
use tracing::debug;

use super::world_name;
use crate::dialect::{self, Collectible, Dialect, GearEntry};
use crate::document::{self, extract, Coerce};
use crate::error::{LodestoneError, Result};
use crate::model::{CharacterProfile, EquipmentSlot, Gender, GrandCompany, Item, Nameday};

const HAND_PREFIXES: [&str; 2] = ["Two-handed ", "One-handed "];
const MAIN_HAND_SUFFIXES: [&str; 3] = ["'s Arm", "'s Primary Tool", "'s Grimoire"];

/// The parts of a profile that verification compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHeader {
    pub name: String,
    pub server: String,
    pub introduction: Option<String>,
}

/// Check that the page for `lodestone_id` really is that character's profile.
///
/// The site answers unknown or deleted ids with a generic page and a success
/// status, so the profile's link back to itself has to end in the id.
pub fn confirm_identity(body: &str, lodestone_id: &str) -> Result<&'static dyn Dialect> {
    let doc = document::parse(body);
    let dialect = dialect::detect(&doc)?;
    check_self_link(doc.root_element(), dialect, lodestone_id)?;
    Ok(dialect)
}

fn check_self_link(root: ElementRef<'_>, dialect: &dyn Dialect, lodestone_id: &str) -> Result<()> {
    let link: Option<String> = extract::optional(root, "self_link", &dialect.table().self_link);
    match link {
        Some(href) if document::last_digits(&href).as_deref() == Some(lodestone_id) => Ok(()),
        Some(href) => Err(LodestoneError::DoesNotExist(format!(
            "character {} (page links to {})",
            lodestone_id, href
        ))),
        None => Err(LodestoneError::DoesNotExist(format!(
            "character {} (no profile link)",
            lodestone_id
        ))),
    }
}

/// Name, world and self-introduction of a profile page.
pub fn parse_header(body: &str) -> Result<ProfileHeader> {
    let doc = document::parse(body);
    let dialect = dialect::detect(&doc)?;
    let root = doc.root_element();
    let table = dialect.table();

    Ok(ProfileHeader {
        name: identity_field(root, "name", &table.name)?,
        server: world_name(&identity_field(root, "server", &table.server)?),
        introduction: extract::optional(root, "introduction", &table.introduction),
    })
}

fn identity_field(root: ElementRef<'_>, field: &str, spec: &document::PathSpec) -> Result<String> {
    extract::required::<String>(root, field, spec).map_err(|e| match e {
        LodestoneError::FieldNotFound(_) | LodestoneError::CoercionError { .. } => {
            LodestoneError::DoesNotExist(format!("profile has no {}", field))
        }
        other => other,
    })
}

/// Build a profile from the character page. Achievements are left empty; they
/// come from their own paginated listing.
pub fn parse_character(body: &str, lodestone_id: &str) -> Result<CharacterProfile> {
    let doc = document::parse(body);
    let dialect = dialect::detect(&doc)?;
    let root = doc.root_element();
    let table = dialect.table();

    check_self_link(root, dialect, lodestone_id)?;

    let name = identity_field(root, "name", &table.name)?;
    let server = world_name(&identity_field(root, "server", &table.server)?);

    let (race, clan, gender) = extract::optional::<String>(root, "race", &table.race_line)
        .map(|line| split_race_line(&line))
        .unwrap_or_default();

    let grand_company = extract::optional::<String>(root, "grand_company", &table.grand_company)
        .and_then(|text| split_grand_company(&text));

    let gear = dialect.equipment_layout(root);
    let (equipment, current_class) = place_equipment(&gear);

    let profile = CharacterProfile {
        id: lodestone_id.to_string(),
        name,
        server,
        title: extract::optional(root, "title", &table.title),
        race,
        clan,
        gender,
        nameday: extract::optional::<Nameday>(root, "nameday", &table.nameday),
        guardian: extract::optional(root, "guardian", &table.guardian),
        city_state: extract::optional(root, "city_state", &table.city_state),
        grand_company,
        free_company: dialect.free_company(root),
        classes: dialect.classes(root),
        stats: dialect.stats(root),
        minions: dialect.collectible(root, Collectible::Minions),
        mounts: dialect.collectible(root, Collectible::Mounts),
        current_class,
        equipment,
        achievements: BTreeMap::new(),
        legacy: has_legacy_mark(&doc, dialect),
        avatar_url: extract::optional(root, "avatar_url", &table.avatar),
        portrait_url: extract::optional(root, "portrait_url", &table.portrait),
        introduction: extract::optional(root, "introduction", &table.introduction),
        dialect: dialect.name().to_string(),
    };

    debug!(
        lodestone_id = %profile.id,
        dialect = %profile.dialect,
        classes = profile.classes.len(),
        "assembled character"
    );
    Ok(profile)
}

fn has_legacy_mark(doc: &Html, dialect: &dyn Dialect) -> bool {
    document::has_match(doc, dialect.table().legacy_marker)
}

/// "Hyur / Midlander / ♂" or "Hyur\nMidlander / ♂".
fn split_race_line(line: &str) -> (Option<String>, Option<String>, Option<Gender>) {
    let parts: Vec<&str> = line
        .split(|c| c == '/' || c == '\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let race = parts.first().map(|s| s.to_string());
    let clan = parts.get(1).map(|s| s.to_string());
    let gender = parts.get(2).and_then(|g| {
        // The symbol may trail other text in some renderings.
        Gender::coerce(g).or_else(|| g.chars().last().and_then(|c| Gender::coerce(&c.to_string())))
    });
    (race, clan, gender)
}

/// "Immortal Flames/Second Flame Lieutenant" into affiliation and rank.
fn split_grand_company(text: &str) -> Option<GrandCompany> {
    let mut parts = text.splitn(2, '/').map(str::trim);
    let name = parts.next().filter(|n| !n.is_empty())?.to_string();
    let rank = parts.next().filter(|r| !r.is_empty()).map(str::to_string);
    Some(GrandCompany { name, rank })
}

/// Canonical slot for a printed gear category.
pub fn slot_for_category(category: &str) -> Option<EquipmentSlot> {
    let slot = match category {
        "Shield" => EquipmentSlot::OffHand,
        "Head" => EquipmentSlot::Head,
        "Body" => EquipmentSlot::Body,
        "Hands" => EquipmentSlot::Hands,
        "Waist" => EquipmentSlot::Waist,
        "Legs" => EquipmentSlot::Legs,
        "Feet" => EquipmentSlot::Feet,
        "Earrings" => EquipmentSlot::Ears,
        "Necklace" => EquipmentSlot::Neck,
        "Bracelets" => EquipmentSlot::Wrists,
        "Ring" => EquipmentSlot::Ring1,
        "Soul Crystal" => EquipmentSlot::SoulCrystal,
        c if c.ends_with("'s Secondary Tool") => EquipmentSlot::OffHand,
        c if MAIN_HAND_SUFFIXES.iter().any(|s| c.ends_with(s)) => EquipmentSlot::MainHand,
        _ => return None,
    };
    Some(slot)
}

/// "Two-handed Marauder's Arm" to "Marauder".
pub fn class_from_category(category: &str) -> String {
    let mut label = category.trim();
    for prefix in HAND_PREFIXES {
        label = label.strip_prefix(prefix).unwrap_or(label);
    }
    for suffix in MAIN_HAND_SUFFIXES {
        label = label.strip_suffix(suffix).unwrap_or(label);
    }
    label.to_string()
}

/// Lay gear entries out in canonical slot order. The class in use is read off
/// the main-hand category.
fn place_equipment(gear: &[GearEntry]) -> (Vec<Option<Item>>, Option<String>) {
    let mut slots: Vec<Option<Item>> = vec![None; EquipmentSlot::ALL.len()];
    let mut current_class = None;

    for entry in gear {
        let Some(mut slot) = slot_for_category(&entry.category) else {
            debug!(category = %entry.category, item = %entry.name, "unrecognised gear category");
            continue;
        };
        if slot == EquipmentSlot::Ring1 && slots[slot.index()].is_some() {
            slot = EquipmentSlot::Ring2;
        }
        if slots[slot.index()].is_some() {
            debug!(category = %entry.category, item = %entry.name, "gear slot already filled");
            continue;
        }
        if slot == EquipmentSlot::MainHand {
            current_class = Some(class_from_category(&entry.category));
        }
        slots[slot.index()] = Some(Item {
            name: entry.name.clone(),
            category: entry.category.clone(),
            slot,
        });
    }

    (slots, current_class)
}
