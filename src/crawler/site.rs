//! Site crawler - depth-bounded traversal of a site's internal links
//!
//! The traversal is depth-first over an explicit worklist, visiting pages in
//! the same order a recursive walk would. Each crawl owns its own
//! [`VisitedSet`], so independent crawls never suppress each other's URLs.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::parser::extract_links;
use crate::url::is_internal;
use reqwest::Client;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// URLs visited during one crawl, in first-visit order
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Records a URL; returns false if it was already present
    pub fn insert(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.order.push(url.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the set, returning URLs in the order they were first visited
    pub fn into_urls(self) -> Vec<String> {
        self.order
    }
}

/// A URL waiting on the worklist together with its link distance from the seed
#[derive(Debug, Clone)]
struct FrontierEntry {
    url: String,
    depth: u32,
}

/// Crawls a single site from a seed URL
pub struct SiteCrawler {
    client: Client,
    max_pages: Option<usize>,
}

impl SiteCrawler {
    /// Creates a crawler using an already configured HTTP client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_pages: None,
        }
    }

    /// Builds a crawler from the configuration
    ///
    /// The client carries the configured user agent and request timeout.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        Ok(Self::new(client).with_max_pages(config.crawler.max_pages))
    }

    /// Caps the number of pages recorded per crawl
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Crawls the site reachable from `seed_url` within `max_depth` link hops
    ///
    /// # Traversal Rules
    ///
    /// 1. Pop the next (url, depth) entry; skip it if already visited or
    ///    deeper than `max_depth`
    /// 2. Record it as visited
    /// 3. Fetch the page and extract its links, resolved against the URL
    ///    that was requested
    /// 4. Keep links that [`is_internal`] accepts against the ORIGINAL seed
    ///    and push them at depth + 1
    ///
    /// Pages at `max_depth` are recorded without being fetched, since every
    /// link on them would be out of range. A failed fetch only abandons that
    /// page's links; the crawl itself never fails.
    ///
    /// # Returns
    ///
    /// Every visited URL, seed first, in first-visit order.
    pub async fn crawl(&self, seed_url: &str, max_depth: u32) -> Vec<String> {
        let start_time = Instant::now();
        let mut visited = VisitedSet::new();
        let mut stack = vec![FrontierEntry {
            url: seed_url.to_string(),
            depth: 0,
        }];

        tracing::info!("Crawling {} (max depth {})", seed_url, max_depth);

        while let Some(entry) = stack.pop() {
            if entry.depth > max_depth || visited.contains(&entry.url) {
                continue;
            }

            if let Some(limit) = self.max_pages {
                if visited.len() >= limit {
                    tracing::info!("Reached page limit of {}, stopping crawl", limit);
                    break;
                }
            }

            visited.insert(&entry.url);

            if entry.depth == max_depth {
                continue;
            }

            let Some(links) = self.expand(&entry.url).await else {
                continue;
            };

            // Reverse so the first link on the page is popped first
            for link in links.into_iter().rev() {
                if is_internal(seed_url, &link) && !visited.contains(&link) {
                    stack.push(FrontierEntry {
                        url: link,
                        depth: entry.depth + 1,
                    });
                }
            }
        }

        tracing::info!(
            "Crawl completed: {} pages discovered in {:?}",
            visited.len(),
            start_time.elapsed()
        );

        visited.into_urls()
    }

    /// Fetches one page and returns its links, or None if it cannot be expanded
    ///
    /// Links are resolved against the requested URL, not the post-redirect
    /// one, so a seed that redirects to another host keeps its relative
    /// links on the seed's host.
    async fn expand(&self, url: &str) -> Option<Vec<String>> {
        let page_url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Failed to crawl {}: bad URL: {}", url, e);
                return None;
            }
        };

        tracing::debug!("Fetching {}", url);

        match fetch_page(&self.client, url).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                let links = extract_links(&body, &page_url);
                tracing::debug!("Found {} links on {}", links.len(), url);
                Some(links)
            }
            failure => {
                tracing::warn!(
                    "Failed to crawl {}: {}",
                    url,
                    failure.failure_reason().unwrap_or_default()
                );
                None
            }
        }
    }
}
