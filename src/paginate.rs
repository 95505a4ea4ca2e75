//! Pagination Aggregator
//!
//! Listings (achievements, free company roster) span several pages. Page 1 is
//! fetched and parsed by the caller; the page count is read from its pager and
//! pages 2..N are fetched under a bounded worker pool, each parsed on its own,
//! then merged after every fetch has completed.

use std::collections::HashMap;
use std::hash::Hash;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::document;
use crate::error::Result;
use crate::http::Transport;

/// What a failed page fetch does to the whole listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failed page (in page order) fails the aggregation.
    Fatal,
    /// A failed page is logged and contributes no entries.
    Degrade,
}

/// Upper bound on pages followed for one listing. A full roster or
/// achievement list is a few dozen pages.
pub const MAX_PAGES: usize = 1000;

/// Total pages announced by the pager's `rel="last"` link, e.g.
/// `/lodestone/freecompany/1/member/?page=3`. One if the pager is missing
/// or unreadable, at most [`MAX_PAGES`].
pub fn page_count(body: &str) -> usize {
    let doc = document::parse(body);
    let Ok(sel) = document::selector("[rel=last]") else {
        return 1;
    };

    let announced = doc
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| href.rsplit('=').next())
        .and_then(|last| last.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1);

    if announced > MAX_PAGES as u64 {
        warn!(announced, max = MAX_PAGES, "pager announces too many pages, truncating");
        return MAX_PAGES;
    }
    announced as usize
}

/// Bounded fan-out over listing pages.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    workers: usize,
    policy: FailurePolicy,
}

impl Pagination {
    pub fn new(workers: usize, policy: FailurePolicy) -> Self {
        Self {
            workers: workers.max(1),
            policy,
        }
    }

    /// Fetch and parse pages `2..=pages`, at most `workers` in flight.
    ///
    /// Returns per-page entry lists in page order. Every fetch completes before
    /// this returns, including under [`FailurePolicy::Fatal`].
    pub async fn fetch_rest<T, E, U, P>(
        &self,
        transport: &T,
        pages: usize,
        page_url: U,
        parse: P,
    ) -> Result<Vec<Vec<E>>>
    where
        T: Transport + ?Sized,
        U: Fn(usize) -> String,
        P: Fn(&str) -> Vec<E>,
    {
        if pages < 2 {
            return Ok(Vec::new());
        }

        let parse = &parse;

        // Futures are created as the buffer drains, at most `workers` at a time,
        // and come out in page order.
        let results: Vec<_> = stream::iter(2..=pages)
            .map(|page| {
                let url = page_url(page);
                async move {
                    let fetched = transport.get(&url).await;
                    (page, url, fetched.map(|body| parse(&body)))
                }
            })
            .buffered(self.workers)
            .collect()
            .await;

        let mut per_page = Vec::with_capacity(results.len());
        for (page, url, result) in results {
            match result {
                Ok(entries) => {
                    debug!(page, count = entries.len(), "parsed listing page");
                    per_page.push(entries);
                }
                Err(e) => match self.policy {
                    FailurePolicy::Fatal => return Err(e),
                    FailurePolicy::Degrade => {
                        warn!(page, url = %url, error = %e, "listing page dropped");
                    }
                },
            }
        }

        Ok(per_page)
    }

    /// Page 1's entries plus every further page the pager announces, merged by key.
    pub async fn aggregate<T, E, K, U, P, KF>(
        &self,
        transport: &T,
        first_body: &str,
        page_url: U,
        parse: P,
        key: KF,
    ) -> Result<Vec<E>>
    where
        T: Transport + ?Sized,
        K: Eq + Hash,
        U: Fn(usize) -> String,
        P: Fn(&str) -> Vec<E>,
        KF: Fn(&E) -> K,
    {
        let first = parse(first_body);
        let pages = page_count(first_body);
        debug!(pages, first_page = first.len(), "aggregating listing");

        let rest = self.fetch_rest(transport, pages, page_url, &parse).await?;
        Ok(merge_keyed(std::iter::once(first).chain(rest), key))
    }
}

/// Flatten per-page lists, keeping one entry per key. A later duplicate replaces
/// the earlier value but keeps the earlier position.
pub fn merge_keyed<E, K, I, KF>(pages: I, key: KF) -> Vec<E>
where
    I: IntoIterator<Item = Vec<E>>,
    K: Eq + Hash,
    KF: Fn(&E) -> K,
{
    let mut merged: Vec<E> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for entry in pages.into_iter().flatten() {
        match index.get(&key(&entry)) {
            Some(&at) => merged[at] = entry,
            None => {
                index.insert(key(&entry), merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}
