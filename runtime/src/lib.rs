//! Sitemap census: crawl the pages listed in XML sitemaps and count how
//! often each of a set of CSS classes appears across them.
//!
//! ```no_run
//! use sitemap_census::acquisition::http_client::{HttpClient, HttpConfig};
//! use sitemap_census::cartography::census::Census;
//! use sitemap_census::cli::output::Styled;
//! use sitemap_census::cli::report::ConsoleReporter;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = HttpClient::new(&HttpConfig::default())?;
//! let census = Census::new(
//!     client,
//!     vec!["https://example.com/sitemap.xml".to_string()],
//!     vec!["p-button".to_string()],
//! );
//! let mut reporter = ConsoleReporter::stdio(Styled::new(false), false);
//! let report = census.run(&mut reporter).await?;
//! println!("{} pages analyzed", report.pages_analyzed);
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod cartography;
pub mod cli;
pub mod config;
pub mod error;
