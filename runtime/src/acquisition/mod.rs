//! Network acquisition: plain HTTP fetches of sitemaps and pages.

pub mod http_client;
