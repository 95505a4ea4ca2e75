//! News topics listing.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::scripts;
use crate::document::{self, extract, PathSpec, Rewriter};
use crate::model::NewsTopic;

const LANG: &str = "en";

lazy_static! {
    /// Topic dates are bare unix seconds passed to the page's date formatter.
    static ref TOPIC_TIMESTAMP: Regex = Regex::new(r"1\d{9},").unwrap();
}

/// Topics in listing order. Entries missing a title link or a date are skipped.
pub fn parse_topics(body: &str, domain: &str) -> Vec<NewsTopic> {
    let doc = document::parse(body);
    let (Ok(entry_sel), Ok(body_sel)) = (
        document::selector(".topics_list li"),
        document::selector(".area_inner_cont"),
    ) else {
        return Vec::new();
    };

    let title_link = PathSpec::css(".topics_list_inner a");
    let rewriter = Rewriter::new().drop(&["script"]).link_base(domain);

    let mut topics = Vec::new();
    for entry in doc.select(&entry_sel) {
        let (Some(title), Some(href)) = (
            extract::optional::<String>(entry, "topic.title", &title_link),
            extract::optional::<String>(entry, "topic.href", &title_link.clone().attr("href")),
        ) else {
            debug!("skipping topic without title link");
            continue;
        };

        let timestamp = scripts(entry).iter().find_map(|text| {
            TOPIC_TIMESTAMP
                .find(text)
                .and_then(|m| m.as_str().trim_end_matches(',').parse::<i64>().ok())
        });
        let Some(timestamp) = timestamp else {
            debug!(title = %title, "skipping topic without date");
            continue;
        };

        let link = format!("//{}{}", domain, href);
        let id = link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let body = entry
            .select(&body_sel)
            .next()
            .map(|el| rewriter.rewrite_element(el).trim().to_string())
            .unwrap_or_default();

        topics.push(NewsTopic {
            id,
            title,
            body,
            timestamp,
            link,
            lang: LANG.to_string(),
        });
    }

    topics
}
