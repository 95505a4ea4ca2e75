//! Achievement listing pages.

use tracing::debug;

use super::script_timestamp;
use crate::document::{self, extract, PathSpec};
use crate::model::Achievement;

/// Entries on one page of the earned-achievement listing, in page order.
///
/// An entry without a parsable id or date is skipped; icon and points are
/// best-effort.
pub fn parse_achievement_page(body: &str) -> Vec<Achievement> {
    let doc = document::parse(body);
    let Ok(sel) = document::selector(".achievement_cnts li") else {
        return Vec::new();
    };

    let more = PathSpec::css(".bt_more").attr("href");
    let icon = PathSpec::css(".ic_achievement img").attr("src");
    let name = PathSpec::css(".achievement_name");
    let points = PathSpec::css(".achievement_point");

    let mut entries = Vec::new();
    for entry in doc.select(&sel) {
        let id = extract::optional::<String>(entry, "achievement.href", &more)
            .and_then(|href| document::last_digits(&href))
            .and_then(|digits| digits.parse::<u32>().ok())
            .filter(|id| *id > 0);
        let Some(id) = id else {
            debug!("skipping achievement entry without id");
            continue;
        };
        let Some(date) = script_timestamp(entry) else {
            debug!(achievement_id = id, "skipping achievement entry without date");
            continue;
        };

        entries.push(Achievement {
            id,
            name: extract::optional(entry, "achievement.name", &name).unwrap_or_default(),
            icon: extract::optional(entry, "achievement.icon", &icon).unwrap_or_default(),
            date,
            points: extract::optional(entry, "achievement.points", &points),
        });
    }

    entries
}
