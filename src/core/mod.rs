pub mod analyze;
pub mod classify;
pub mod fetch;
pub mod html;
pub mod model;
pub mod script;

pub use analyze::{analyze_items, analyze_link};
pub use classify::{classify_link, classify_links, expand_collections};
pub use fetch::{HttpFetcher, PageFetcher};
pub use model::{Analysis, Classification, ClassifiedLink, IdPair, LinkKind};
pub use script::{directive, generate_script};
