//! Free company pages: the company profile and its member listing.
//!
//! The profile page carries the descriptive fields (tag, slogan, formation date,
//! crest and the status table). The member listing carries the company's identity
//! header and the roster, and is paginated.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use super::{script_timestamp, unwrap_brackets, world_name};
use crate::document::{self, extract, plain_text, PathSpec};
use crate::error::{LodestoneError, Result};
use crate::model::{Estate, FreeCompanyProfile, Rank, RosterMember};

/// Served with a success status in place of a disbanded or unknown company.
pub const REMOVED_MARKER: &str = "The page you are searching for has either been removed,";

const MAX_TAG_CHARS: usize = 5;

lazy_static! {
    static ref RANK_ICON: Regex = Regex::new(r"class/(\d+?)\.png").unwrap();
    static ref STATUS_ROWS: StatusRows = StatusRows {
        active: PathSpec::css_with_text("th", "Active").next_sibling(),
        recruitment: PathSpec::css_with_text("th", "Recruitment").next_sibling(),
        member_count: PathSpec::css_with_text("th", "Active Members").next_sibling(),
        rank: PathSpec::css_with_text("th", "Rank").next_sibling(),
        estate_name: PathSpec::css_with_text("th", "Estate Profile")
            .next_sibling()
            .select(".txt_yellow"),
        estate_address: PathSpec::css_with_text("th", "Estate Profile")
            .next_sibling()
            .select("p"),
        estate_greeting: PathSpec::css_with_text("th", "Estate Profile")
            .next_sibling()
            .select("p")
            .nth(1)
            .lines(),
    };
}

struct StatusRows {
    active: PathSpec,
    recruitment: PathSpec,
    member_count: PathSpec,
    rank: PathSpec,
    estate_name: PathSpec,
    estate_address: PathSpec,
    estate_greeting: PathSpec,
}

/// Descriptive half of a company, read from its profile page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyDetails {
    pub tag: Option<String>,
    pub slogan: String,
    pub formed: Option<i64>,
    pub crest: Vec<String>,
    pub active: Option<String>,
    pub recruitment: Option<String>,
    pub member_count: Option<String>,
    pub rank: Option<u32>,
    pub estate: Option<Estate>,
}

/// Identity half of a company, read from the member listing header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyHeader {
    pub name: String,
    /// Lowercased world name.
    pub server: String,
    pub grand_company: String,
    pub standing: Option<String>,
}

fn ensure_present(body: &str, lodestone_id: &str) -> Result<()> {
    if body.contains(REMOVED_MARKER) {
        return Err(LodestoneError::DoesNotExist(format!(
            "free company {} has been removed",
            lodestone_id
        )));
    }
    Ok(())
}

pub fn parse_company_page(body: &str, lodestone_id: &str) -> Result<CompanyDetails> {
    ensure_present(body, lodestone_id)?;
    let doc = document::parse(body);
    let root = doc.root_element();
    let rows = &*STATUS_ROWS;

    let estate = extract::optional::<String>(root, "estate.name", &rows.estate_name).map(|name| {
        Estate {
            name,
            address: extract::optional(root, "estate.address", &rows.estate_address),
            greeting: extract::optional(root, "estate.greeting", &rows.estate_greeting),
        }
    });

    Ok(CompanyDetails {
        tag: company_tag(root),
        slogan: extract::optional(
            root,
            "slogan",
            &PathSpec::css(".table_style2 td").nth(3).lines(),
        )
        .unwrap_or_default(),
        formed: formed_timestamp(root),
        crest: extract::all(root, &PathSpec::css(".ic_crest_64 img").attr("src")),
        active: extract::optional(root, "active", &rows.active),
        recruitment: extract::optional(root, "recruitment", &rows.recruitment),
        member_count: extract::optional(root, "member_count", &rows.member_count),
        rank: extract::optional(root, "rank", &rows.rank),
        estate,
    })
}

/// The tag is the last line of the `.vm` cell, wrapped in «».
fn company_tag(root: ElementRef<'_>) -> Option<String> {
    let sel = document::selector(".vm").ok()?;
    let cell = root.select(&sel).next()?;
    let text = plain_text(cell);
    let raw = text.lines().rev().find(|line| !line.trim().is_empty())?;

    let tag = unwrap_brackets(raw);
    let len = tag.chars().count();
    if (1..=MAX_TAG_CHARS).contains(&len) {
        Some(tag)
    } else {
        debug!(tag = %tag, "discarding malformed company tag");
        None
    }
}

fn formed_timestamp(root: ElementRef<'_>) -> Option<i64> {
    let sel = document::selector(".table_style2 td").ok()?;
    root.select(&sel).find_map(script_timestamp)
}

/// Company identity from the member listing. A listing without the header is
/// not a company page.
pub fn parse_roster_header(body: &str, lodestone_id: &str) -> Result<CompanyHeader> {
    ensure_present(body, lodestone_id)?;
    let doc = document::parse(body);
    let root = doc.root_element();

    let missing = |field: &str| {
        LodestoneError::DoesNotExist(format!("free company {} has no {}", lodestone_id, field))
    };

    let title = PathSpec::css(".ic_freecompany_box span");
    let name = extract::optional::<String>(root, "name", &title.clone().nth(1))
        .ok_or_else(|| missing("name"))?;
    let server = extract::optional::<String>(root, "server", &title.nth(2))
        .map(|s| world_name(&s).to_lowercase())
        .ok_or_else(|| missing("server"))?;
    let grand_company = crest_affiliation(root).ok_or_else(|| missing("grand company"))?;
    let standing =
        extract::optional::<String>(root, "standing", &PathSpec::css(".friendship_color"))
            .map(|s| unwrap_brackets(&s))
            .filter(|s| !s.is_empty());

    Ok(CompanyHeader {
        name,
        server,
        grand_company,
        standing,
    })
}

/// First text run of `.crest_id`; the rest of the cell is the standing badge.
fn crest_affiliation(root: ElementRef<'_>) -> Option<String> {
    let sel = document::selector(".crest_id").ok()?;
    let cell = root.select(&sel).next()?;
    cell.children()
        .filter_map(|n| n.value().as_text().map(|t| document::normalize_ws(t)))
        .find(|t| !t.is_empty())
}

/// Members listed on one roster page, in page order.
///
/// Rows without a rank icon are layout filler and are skipped, as are rows whose
/// name link or rank id cannot be read.
pub fn parse_roster_page(body: &str) -> Vec<RosterMember> {
    let doc = document::parse(body);
    let Ok(sel) = document::selector(".player_name_area") else {
        return Vec::new();
    };

    let anchor = PathSpec::css(".player_name_gold a");
    let href = anchor.clone().attr("href");
    let icon = PathSpec::css("img").attr("src");
    let status = PathSpec::css(".fc_member_status");

    let mut members = Vec::new();
    for row in doc.select(&sel) {
        let Some(src) = extract::optional::<String>(row, "rank.icon", &icon) else {
            continue;
        };
        let Some(rank_id) = RANK_ICON
            .captures(&src)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        else {
            debug!(src = %src, "roster row without rank id");
            continue;
        };
        let Some(name) = extract::optional::<String>(row, "member.name", &anchor) else {
            continue;
        };
        let Some(lodestone_id) = extract::optional::<String>(row, "member.href", &href)
            .and_then(|href| document::first_digits(&href))
        else {
            debug!(member = %name, "roster row without profile link");
            continue;
        };

        members.push(RosterMember {
            name,
            lodestone_id,
            rank: Rank {
                id: rank_id,
                name: extract::optional(row, "rank.name", &status).unwrap_or_default(),
            },
            leader: rank_id == 0,
        });
    }

    members
}

pub fn assemble(
    lodestone_id: &str,
    header: CompanyHeader,
    details: CompanyDetails,
    roster: Vec<RosterMember>,
) -> FreeCompanyProfile {
    FreeCompanyProfile {
        id: lodestone_id.to_string(),
        name: header.name,
        server: header.server,
        grand_company: header.grand_company,
        standing: header.standing,
        tag: details.tag,
        slogan: details.slogan,
        formed: details.formed,
        crest: details.crest,
        active: details.active,
        recruitment: details.recruitment,
        member_count: details.member_count,
        rank: details.rank,
        roster,
        estate: details.estate,
    }
}
