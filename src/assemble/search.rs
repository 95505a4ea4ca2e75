//! Character search results.

use crate::document;
use crate::model::Candidate;

/// Every name/id pair on a search results page, in result order.
pub fn parse_candidates(body: &str) -> Vec<Candidate> {
    let doc = document::parse(body);
    let Ok(sel) = document::selector(".player_name_area .player_name_gold a") else {
        return Vec::new();
    };

    doc.select(&sel)
        .filter_map(|anchor| {
            let name = document::normalize_ws(&anchor.text().collect::<String>());
            let id = anchor.value().attr("href").and_then(document::first_digits)?;
            if name.is_empty() {
                return None;
            }
            Some(Candidate {
                lodestone_id: id,
                name,
            })
        })
        .collect()
}

/// First candidate whose name equals `name`, ignoring case.
pub fn find_candidate(candidates: Vec<Candidate>, name: &str) -> Option<Candidate> {
    let wanted = name.trim().to_lowercase();
    candidates
        .into_iter()
        .find(|c| c.name.to_lowercase() == wanted)
}
