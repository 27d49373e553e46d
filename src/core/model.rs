use serde::{Deserialize, Serialize};

/// Anchors pointing here carry the game (app) ID.
pub const APP_PATTERN: &str = "https://steamcommunity.com/app/";
pub const ITEM_PATTERN: &str = "https://steamcommunity.com/sharedfiles/filedetails/?id=";
/// Only collection pages link to the collection browser of their app.
pub const COLLECTION_PATTERN: &str = "https://steamcommunity.com/workshop/browse/?section=collections&appid=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Item,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLink {
    pub url: String,
    pub kind: LinkKind,
}

/// Result of classifying a batch of links. Both lists keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub items: Vec<String>,
    pub collections: Vec<String>,
    pub success: usize,
    pub errors: usize,
}

impl Classification {
    pub fn push(&mut self, link: ClassifiedLink) {
        match link.kind {
            LinkKind::Item => self.items.push(link.url),
            LinkKind::Collection => self.collections.push(link.url),
        }
        self.success += 1;
    }
}

/// Game and workshop IDs of one item. Both are non-empty digit strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPair {
    pub game_id: String,
    pub workshop_id: String,
}

impl IdPair {
    pub fn new(game_id: impl Into<String>, workshop_id: impl Into<String>) -> Option<Self> {
        let game_id = game_id.into();
        let workshop_id = workshop_id.into();
        if is_id(&game_id) && is_id(&workshop_id) {
            Some(Self { game_id, workshop_id })
        } else {
            None
        }
    }
}

fn is_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub pairs: Vec<IdPair>,
    pub errors: usize,
}
