//! Lodestone records.
//!
//! Every record is built fresh per fetch and handed to the caller; nothing here is
//! cached or mutated by the engine afterwards.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Eorzean birthday. `moon` is the phase index: astral moons are odd, umbral even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nameday {
    pub sun: u32,
    pub moon: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandCompany {
    pub name: String,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeCompanyLink {
    pub id: String,
    pub name: String,
    pub crest: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassProgress {
    pub level: u32,
    pub exp: u64,
    pub exp_next: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Waist,
    Legs,
    Feet,
    Ears,
    Neck,
    Wrists,
    Ring1,
    Ring2,
    SoulCrystal,
}

impl EquipmentSlot {
    /// Canonical slot order; `CharacterProfile::equipment` always has this length.
    pub const ALL: [EquipmentSlot; 14] = [
        EquipmentSlot::MainHand,
        EquipmentSlot::OffHand,
        EquipmentSlot::Head,
        EquipmentSlot::Body,
        EquipmentSlot::Hands,
        EquipmentSlot::Waist,
        EquipmentSlot::Legs,
        EquipmentSlot::Feet,
        EquipmentSlot::Ears,
        EquipmentSlot::Neck,
        EquipmentSlot::Wrists,
        EquipmentSlot::Ring1,
        EquipmentSlot::Ring2,
        EquipmentSlot::SoulCrystal,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Category label as printed on the page, e.g. "Two-handed Marauder's Arm".
    pub category: String,
    pub slot: EquipmentSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u32,
    pub name: String,
    pub icon: String,
    /// Unix seconds.
    pub date: i64,
    pub points: Option<u32>,
}

impl Achievement {
    pub fn earned_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.date, 0).single()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: String,
    pub name: String,
    pub server: String,
    pub title: Option<String>,

    pub race: Option<String>,
    pub clan: Option<String>,
    pub gender: Option<Gender>,

    pub nameday: Option<Nameday>,
    pub guardian: Option<String>,
    pub city_state: Option<String>,

    pub grand_company: Option<GrandCompany>,
    pub free_company: Option<FreeCompanyLink>,

    pub classes: BTreeMap<String, ClassProgress>,
    pub stats: BTreeMap<String, StatValue>,

    pub minions: Vec<String>,
    pub mounts: Vec<String>,

    pub current_class: Option<String>,
    pub equipment: Vec<Option<Item>>,

    pub achievements: BTreeMap<u32, Achievement>,

    pub legacy: bool,
    pub avatar_url: Option<String>,
    pub portrait_url: Option<String>,
    pub introduction: Option<String>,

    /// Which page layout the profile was read with.
    pub dialect: String,
}

impl CharacterProfile {
    pub fn item(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.equipment.get(slot.index()).and_then(|i| i.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub name: String,
    pub lodestone_id: String,
    pub rank: Rank,
    pub leader: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    pub name: String,
    pub address: Option<String>,
    pub greeting: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeCompanyProfile {
    pub id: String,
    pub name: String,
    pub server: String,
    pub grand_company: String,
    /// Grand company standing, e.g. "Allied".
    pub standing: Option<String>,

    pub tag: Option<String>,
    pub slogan: String,
    /// Unix seconds.
    pub formed: Option<i64>,
    pub crest: Vec<String>,

    pub active: Option<String>,
    pub recruitment: Option<String>,
    pub member_count: Option<String>,
    pub rank: Option<u32>,

    pub roster: Vec<RosterMember>,
    pub estate: Option<Estate>,
}

impl FreeCompanyProfile {
    pub fn formed_at(&self) -> Option<DateTime<Utc>> {
        self.formed.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    pub fn leader(&self) -> Option<&RosterMember> {
        self.roster.iter().find(|m| m.leader)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsTopic {
    pub id: String,
    pub title: String,
    /// Sanitised HTML fragment with site-relative links made absolute.
    pub body: String,
    pub timestamp: i64,
    pub link: String,
    pub lang: String,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub lodestone_id: String,
    pub name: String,
}
