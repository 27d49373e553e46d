use tracing::{info, warn};

use super::fetch::PageFetcher;
use super::html;
use super::model::{Classification, ClassifiedLink, LinkKind, COLLECTION_PATTERN, ITEM_PATTERN};
use crate::error::PageError;

/// Fetch one link and decide whether it is an item or a collection page.
pub fn classify_link<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<LinkKind, PageError> {
    let page = fetcher.fetch(url)?;
    if html::count_links_containing(&page, COLLECTION_PATTERN) < 1 {
        Ok(LinkKind::Item)
    } else {
        Ok(LinkKind::Collection)
    }
}

pub fn classify_links<F: PageFetcher + ?Sized>(fetcher: &F, links: &[String]) -> Classification {
    let mut out = Classification::default();
    for (idx, link) in links.iter().enumerate() {
        info!("Classifying links: {} of {}", idx + 1, links.len());
        match classify_link(fetcher, link) {
            Ok(kind) => out.push(ClassifiedLink { url: link.clone(), kind }),
            Err(e) => {
                warn!("Error classifying link {}: {}", link, e);
                out.errors += 1;
            }
        }
    }
    out
}

/// Resolve collection pages into the item links they contain.
///
/// Links already present in `known` are not repeated. Returns the new item links and the
/// number of collections that could not be read.
pub fn expand_collections<F: PageFetcher + ?Sized>(
    fetcher: &F,
    collections: &[String],
    known: &[String],
) -> (Vec<String>, usize) {
    let mut found: Vec<String> = Vec::new();
    let mut errors = 0;
    for (idx, collection) in collections.iter().enumerate() {
        info!("Expanding collections: {} of {}", idx + 1, collections.len());
        let page = match fetcher.fetch(collection) {
            Ok(page) => page,
            Err(e) => {
                warn!("Error expanding collection {}: {}", collection, e);
                errors += 1;
                continue;
            }
        };
        let children = html::collection_children(&page);
        if children.is_empty() {
            warn!("Collection {} lists no items", collection);
        }
        for id in children {
            let link = format!("{ITEM_PATTERN}{id}");
            if !known.contains(&link) && !found.contains(&link) {
                found.push(link);
            }
        }
    }
    (found, errors)
}
