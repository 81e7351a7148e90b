//! Crawler module for discovering a site's pages
//!
//! This module contains the link-graph side of a scan:
//! - HTTP fetching with explicit timeouts
//! - HTML parsing and link extraction
//! - Depth-bounded traversal restricted to internal links

mod fetcher;
mod parser;
mod site;

pub use fetcher::{build_http_client, fetch_page, is_html_content_type, FetchResult};
pub use parser::extract_links;
pub use site::{SiteCrawler, VisitedSet};
