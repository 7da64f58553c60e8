//! Sitemap download and `urlset` parsing.
//!
//! Only plain `urlset` sitemaps are understood. A sitemap index, or any
//! other document shape, is a parse error; nested sitemaps are not followed.

use crate::acquisition::http_client::HttpClient;
use crate::error::SitemapError;
use quick_xml::events::Event;
use tracing::{info, warn};

/// Maximum number of distinct element paths kept in a diagnostic outline.
const OUTLINE_LIMIT: usize = 24;
/// Paths deeper than this are left out of the outline.
const OUTLINE_DEPTH: usize = 3;

/// Why a document was rejected, plus what was seen while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSitemap {
    pub reason: String,
    pub outline: String,
}

/// Download one sitemap and return its page URLs in document order.
pub async fn fetch_sitemap(client: &HttpClient, url: &str) -> Result<Vec<String>, SitemapError> {
    let body = client.get_ok(url).await?;

    match parse_sitemap(&body) {
        Ok(locs) => {
            info!(url, pages = locs.len(), "parsed sitemap");
            Ok(locs)
        }
        Err(invalid) => {
            warn!(url, outline = %invalid.outline, "{}", invalid.reason);
            Err(SitemapError::Parse {
                url: url.to_string(),
                reason: invalid.reason,
                outline: invalid.outline,
            })
        }
    }
}

/// Parse a `<urlset><url><loc>…</loc></url>…</urlset>` document.
///
/// Element names are compared by local name, so `<sm:urlset>` is accepted.
/// Only direct `url` children of the root count, and only the first `loc`
/// of each entry is used.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, InvalidSitemap> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut outline = Outline::default();
    let mut stack: Vec<String> = Vec::new();
    let mut root: Option<String> = None;
    let mut locs = Vec::new();
    let mut entries = 0usize;
    let mut missing_loc: Option<usize> = None;
    // Some(loc) while inside a `url` entry; the loc is None until seen.
    let mut entry: Option<Option<String>> = None;
    let mut capture: Option<String> = None;

    let fail = |reason: String, outline: &Outline| InvalidSitemap {
        reason,
        outline: outline.render(),
    };

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(fail(
                    format!(
                        "malformed XML at byte {}: {e}",
                        reader.error_position()
                    ),
                    &outline,
                ))
            }
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                if stack.is_empty() {
                    if root.is_some() {
                        return Err(fail("multiple root elements".to_string(), &outline));
                    }
                    root = Some(name.clone());
                }
                stack.push(name);
                outline.record(&stack);

                let in_urlset = stack[0] == "urlset";
                match stack.len() {
                    2 if in_urlset && stack[1] == "url" => {
                        entries += 1;
                        entry = Some(None);
                    }
                    3 if in_urlset && stack[1] == "url" && stack[2] == "loc" => {
                        if matches!(entry, Some(None)) {
                            capture = Some(String::new());
                        }
                    }
                    _ => {}
                }

                if is_empty {
                    close_element(
                        &mut stack,
                        &mut entry,
                        &mut capture,
                        &mut locs,
                        &mut missing_loc,
                        entries,
                    );
                }
            }
            Event::Text(ref e) => {
                if let Some(text) = capture.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| fail(format!("malformed XML text: {err}"), &outline))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(text) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => close_element(
                &mut stack,
                &mut entry,
                &mut capture,
                &mut locs,
                &mut missing_loc,
                entries,
            ),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(fail(
            format!("unexpected end of document inside <{}>", stack.join("><")),
            &outline,
        ));
    }

    match root.as_deref() {
        None => return Err(fail("document has no root element".to_string(), &outline)),
        Some("urlset") => {}
        Some(other) => {
            return Err(fail(
                format!("root element is <{other}>, expected <urlset>"),
                &outline,
            ))
        }
    }

    if entries == 0 {
        return Err(fail("<urlset> contains no <url> entries".to_string(), &outline));
    }

    if let Some(index) = missing_loc {
        return Err(fail(
            format!("<url> entry #{index} has no <loc>"),
            &outline,
        ));
    }

    Ok(locs)
}

/// Pop the current element, finishing a `loc` capture or a `url` entry.
fn close_element(
    stack: &mut Vec<String>,
    entry: &mut Option<Option<String>>,
    capture: &mut Option<String>,
    locs: &mut Vec<String>,
    missing_loc: &mut Option<usize>,
    entries: usize,
) {
    let in_urlset = stack.first().is_some_and(|root| root == "urlset");
    match stack.len() {
        3 if in_urlset => {
            if let Some(text) = capture.take() {
                *entry = Some(Some(text.trim().to_string()));
            }
        }
        2 if in_urlset && stack[1] == "url" => match entry.take() {
            Some(Some(loc)) => locs.push(loc),
            _ => {
                missing_loc.get_or_insert(entries);
            }
        },
        _ => {}
    }
    stack.pop();
}

/// Distinct element paths seen while parsing, e.g. `sitemapindex/sitemap/loc`.
#[derive(Debug, Default)]
struct Outline {
    paths: Vec<String>,
    truncated: bool,
}

impl Outline {
    fn record(&mut self, stack: &[String]) {
        if stack.len() > OUTLINE_DEPTH {
            return;
        }
        let path = stack.join("/");
        if self.paths.contains(&path) {
            return;
        }
        if self.paths.len() >= OUTLINE_LIMIT {
            self.truncated = true;
            return;
        }
        self.paths.push(path);
    }

    fn render(&self) -> String {
        if self.paths.is_empty() {
            return "(no elements)".to_string();
        }
        let mut out = self.paths.join(", ");
        if self.truncated {
            out.push_str(", ...");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sitemap_document_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/</loc><lastmod>2026-01-01</lastmod></url>
          <url><loc>https://example.com/about</loc></url>
          <url>
            <loc>
              https://example.com/docs?a=1&amp;b=2
            </loc>
            <priority>0.5</priority>
          </url>
        </urlset>"#;

        let locs = parse_sitemap(xml).unwrap();
        assert_eq!(
            locs,
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/docs?a=1&b=2",
            ]
        );
    }

    #[test]
    fn test_parse_sitemap_prefixed_and_cdata() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sm:url><sm:loc><![CDATA[https://example.com/x]]></sm:loc></sm:url>
        </sm:urlset>"#;

        assert_eq!(parse_sitemap(xml).unwrap(), vec!["https://example.com/x"]);
    }

    #[test]
    fn test_only_first_loc_and_direct_children_count() {
        let xml = r#"<urlset>
          <url><loc>https://example.com/1</loc><loc>https://example.com/dup</loc></url>
          <group><url><loc>https://example.com/nested</loc></url></group>
          <url><loc>https://example.com/2</loc></url>
        </urlset>"#;

        assert_eq!(
            parse_sitemap(xml).unwrap(),
            vec!["https://example.com/1", "https://example.com/2"]
        );
    }

    #[test]
    fn test_empty_loc_is_kept() {
        let xml = "<urlset><url><loc/></url><url><loc></loc></url></urlset>";
        assert_eq!(parse_sitemap(xml).unwrap(), vec!["", ""]);
    }

    #[test]
    fn test_sitemap_index_is_rejected_with_outline() {
        let xml = r#"<?xml version="1.0"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
        </sitemapindex>"#;

        let err = parse_sitemap(xml).unwrap_err();
        assert!(err.reason.contains("<sitemapindex>"));
        assert_eq!(
            err.outline,
            "sitemapindex, sitemapindex/sitemap, sitemapindex/sitemap/loc"
        );
    }

    #[test]
    fn test_urlset_without_entries_is_rejected() {
        let err = parse_sitemap("<urlset></urlset>").unwrap_err();
        assert!(err.reason.contains("no <url> entries"));

        let err = parse_sitemap("<urlset/>").unwrap_err();
        assert!(err.reason.contains("no <url> entries"));
    }

    #[test]
    fn test_url_without_loc_is_rejected() {
        let xml = r#"<urlset>
          <url><loc>https://example.com/1</loc></url>
          <url><lastmod>2026-01-01</lastmod></url>
          <url/>
        </urlset>"#;

        let err = parse_sitemap(xml).unwrap_err();
        assert_eq!(err.reason, "<url> entry #2 has no <loc>");
    }

    #[test]
    fn test_malformed_and_empty_documents() {
        let err = parse_sitemap("<urlset><url><loc>x</url></urlset>").unwrap_err();
        assert!(err.reason.starts_with("malformed XML"));

        // Depending on the reader, an unclosed root surfaces either way.
        let err = parse_sitemap("<urlset><url><loc>x</loc></url>").unwrap_err();
        assert!(
            err.reason.starts_with("unexpected end of document")
                || err.reason.starts_with("malformed XML")
        );

        let err = parse_sitemap("").unwrap_err();
        assert_eq!(err.reason, "document has no root element");
        assert_eq!(err.outline, "(no elements)");
    }

    #[test]
    fn test_outline_is_bounded() {
        let mut outline = Outline::default();
        for i in 0..(OUTLINE_LIMIT + 5) {
            outline.record(&["root".to_string(), format!("child{i}")]);
        }
        outline.record(&[
            "root".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]);
        assert_eq!(outline.paths.len(), OUTLINE_LIMIT);
        assert!(outline.render().ends_with(", ..."));
    }
}
