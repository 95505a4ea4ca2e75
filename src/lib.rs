//! Lodestone scraper for FINAL FANTASY XIV.
//!
//! Reads character profiles, achievements, free companies and news topics from
//! the public Lodestone pages and returns them as typed records.

pub mod assemble;
pub mod blocking;
pub mod client;
pub mod config;
pub mod dialect;
pub mod document;
pub mod error;
pub mod http;
pub mod model;
pub mod paginate;
pub mod server;

pub use client::Lodestone;
pub use config::ScraperConfig;
pub use error::{LodestoneError, Result};
pub use http::{HttpClient, Transport};
pub use model::{
    Achievement, Candidate, CharacterProfile, EquipmentSlot, FreeCompanyProfile, NewsTopic,
    RosterMember,
};
