pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod result;
pub mod scope;
pub mod sink;
pub mod sitemap;
pub mod visited;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetcher::{Fetcher, Page};
pub use result::{CrawlSummary, DiscoveredLink};
pub use scope::CrawlScope;
pub use sink::LinkSink;
pub use sitemap::{PreSeed, SitemapSeeder};
pub use visited::VisitedSet;
