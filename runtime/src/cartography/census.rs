//! The census driver: sitemaps in, per-class totals out.
//!
//! Everything runs one request at a time. Sitemap errors end the run; page
//! errors are reported and skipped, and `run` has no way to return one.

use crate::acquisition::http_client::HttpClient;
use crate::cartography::class_counter::{analyze_page, unique_classes, ClassCounts};
use crate::cartography::sitemap::fetch_sitemap;
use crate::error::{PageError, SitemapError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// Sink for everything a run has to say. Console colors, JSON output and
/// test recorders are all implementations of this.
pub trait Reporter: Send {
    /// About to download a sitemap.
    fn sitemap_started(&mut self, url: &str);
    /// A sitemap was parsed into `pages` page URLs.
    fn sitemap_parsed(&mut self, _url: &str, _pages: usize) {}
    /// `count` elements of `class` were found on `url`. Only called for
    /// non-zero counts; `index` is the class's position in the input.
    fn class_found(&mut self, url: &str, class: &str, index: usize, count: u64);
    fn page_analyzed(&mut self, url: &str);
    fn page_failed(&mut self, url: &str, error: &PageError);
    /// The run is over; `report.totals` holds every tracked class.
    fn finished(&mut self, report: &CensusReport);
}

/// A page that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct CensusReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sitemaps: usize,
    pub pages_discovered: usize,
    pub pages_analyzed: usize,
    pub failures: Vec<PageFailure>,
    pub totals: ClassCounts,
}

/// Crawls a list of sitemaps and counts tracked classes across all pages.
pub struct Census {
    client: HttpClient,
    sitemaps: Vec<String>,
    classes: Vec<String>,
}

impl Census {
    /// Repeated class names are tracked once, at their first position.
    pub fn new(client: HttpClient, sitemaps: Vec<String>, classes: Vec<String>) -> Self {
        Self {
            client,
            sitemaps,
            classes: unique_classes(&classes),
        }
    }

    /// Download every sitemap, in order, and concatenate their page URLs.
    /// Duplicates across sitemaps are kept.
    pub async fn collect_pages(
        &self,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<String>, SitemapError> {
        let mut pages = Vec::new();
        for sitemap in &self.sitemaps {
            reporter.sitemap_started(sitemap);
            let mut locs = fetch_sitemap(&self.client, sitemap).await?;
            reporter.sitemap_parsed(sitemap, locs.len());
            pages.append(&mut locs);
        }
        Ok(pages)
    }

    /// Analyze one page and report its non-zero counts.
    pub async fn census_page(
        &self,
        url: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<ClassCounts, PageError> {
        let counts = analyze_page(&self.client, url, &self.classes).await?;
        for (index, entry) in counts.iter().enumerate() {
            if entry.count > 0 {
                reporter.class_found(url, &entry.class, index, entry.count);
            }
        }
        reporter.page_analyzed(url);
        Ok(counts)
    }

    /// Run the whole census.
    pub async fn run(&self, reporter: &mut dyn Reporter) -> Result<CensusReport, SitemapError> {
        let started_at = Utc::now();
        let mut totals = ClassCounts::zeroed(&self.classes);

        let pages = self.collect_pages(reporter).await?;
        info!(
            sitemaps = self.sitemaps.len(),
            pages = pages.len(),
            "collected page URLs"
        );

        let mut analyzed = 0;
        let mut failures = Vec::new();
        for url in &pages {
            match self.census_page(url, reporter).await {
                Ok(counts) => {
                    debug!(url = %url, found = counts.total(), "page counted");
                    totals.merge(&counts);
                    analyzed += 1;
                }
                Err(e) => {
                    reporter.page_failed(url, &e);
                    failures.push(PageFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = CensusReport {
            started_at,
            finished_at: Utc::now(),
            sitemaps: self.sitemaps.len(),
            pages_discovered: pages.len(),
            pages_analyzed: analyzed,
            failures,
            totals,
        };
        info!(
            analyzed = report.pages_analyzed,
            failed = report.failures.len(),
            "census complete"
        );
        reporter.finished(&report);
        Ok(report)
    }
}
