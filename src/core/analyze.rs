use tracing::{debug, info, warn};

use super::fetch::PageFetcher;
use super::html;
use super::model::{Analysis, IdPair, APP_PATTERN};
use crate::error::PageError;

/// Extract the (game ID, workshop ID) pair of one item link.
///
/// The game ID comes from the first anchor on the page that targets an app page, the
/// workshop ID from the link itself. Nothing carries over between calls, so a page without
/// an app anchor is an error rather than a reuse of an earlier value.
pub fn analyze_link<F: PageFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<IdPair, PageError> {
    let page = fetcher.fetch(url)?;
    let app_link = html::first_link_containing(&page, APP_PATTERN)
        .ok_or_else(|| PageError::NoAppLink { url: url.to_string() })?;
    let game_id = html::first_digit_run(&app_link)
        .ok_or_else(|| PageError::MissingId { url: url.to_string(), kind: "game" })?;
    let workshop_id = html::workshop_id_from_url(url)
        .ok_or_else(|| PageError::MissingId { url: url.to_string(), kind: "workshop" })?;
    debug!(%app_link, game_id, %workshop_id, "item analyzed");
    Ok(IdPair { game_id: game_id.to_string(), workshop_id })
}

pub fn analyze_items<F: PageFetcher + ?Sized>(fetcher: &F, items: &[String]) -> Analysis {
    let mut out = Analysis::default();
    for (idx, item) in items.iter().enumerate() {
        info!("Analyzing items links: {} of {}", idx + 1, items.len());
        match analyze_link(fetcher, item) {
            Ok(pair) => out.pairs.push(pair),
            Err(e) => {
                warn!("Error analyzing item {}: {}", item, e);
                out.errors += 1;
            }
        }
    }
    out
}
