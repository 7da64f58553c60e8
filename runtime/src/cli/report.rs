//! Console and JSON implementations of [`Reporter`].

use crate::cartography::census::{CensusReport, Reporter};
use crate::cli::output::Styled;
use crate::error::PageError;
use std::io::Write;
use tracing::warn;

/// Line-oriented human output: progress and totals on `out`, errors on `err`.
pub struct ConsoleReporter<O: Write + Send, E: Write + Send> {
    out: O,
    err: E,
    style: Styled,
    quiet: bool,
}

impl ConsoleReporter<std::io::Stdout, std::io::Stderr> {
    pub fn stdio(style: Styled, quiet: bool) -> Self {
        Self::new(std::io::stdout(), std::io::stderr(), style, quiet)
    }
}

impl<O: Write + Send, E: Write + Send> ConsoleReporter<O, E> {
    /// `quiet` keeps only error lines and the final totals.
    pub fn new(out: O, err: E, style: Styled, quiet: bool) -> Self {
        Self {
            out,
            err,
            style,
            quiet,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn line(&mut self, text: &str) {
        if !self.quiet {
            let _ = writeln!(self.out, "{text}");
        }
    }
}

impl<O: Write + Send, E: Write + Send> Reporter for ConsoleReporter<O, E> {
    fn sitemap_started(&mut self, _url: &str) {
        self.line("Downloading sitemap");
    }

    fn class_found(&mut self, url: &str, class: &str, index: usize, count: u64) {
        let text = self
            .style
            .class_color(index, &format!("Found {count} instances of .{class} in {url}"));
        self.line(&text);
    }

    fn page_analyzed(&mut self, url: &str) {
        self.line(&format!("Analyzed HTML for {url}"));
    }

    fn page_failed(&mut self, url: &str, error: &PageError) {
        let _ = writeln!(self.err, "Error processing {url}: {error}");
    }

    fn finished(&mut self, report: &CensusReport) {
        for entry in report.totals.iter() {
            let _ = writeln!(
                self.out,
                "Total instances of .{}: {}",
                entry.class, entry.count
            );
        }
        let _ = self.out.flush();
    }
}

/// Prints the whole [`CensusReport`] as pretty JSON once the run finishes.
/// Page errors still go to `err` as they happen, one line each.
pub struct JsonReporter<O: Write + Send, E: Write + Send> {
    out: O,
    err: E,
}

impl JsonReporter<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> JsonReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> Reporter for JsonReporter<O, E> {
    fn sitemap_started(&mut self, _url: &str) {}

    fn class_found(&mut self, _url: &str, _class: &str, _index: usize, _count: u64) {}

    fn page_analyzed(&mut self, _url: &str) {}

    fn page_failed(&mut self, url: &str, error: &PageError) {
        let _ = writeln!(self.err, "Error processing {url}: {error}");
    }

    fn finished(&mut self, report: &CensusReport) {
        match serde_json::to_string_pretty(report) {
            Ok(json) => {
                let _ = writeln!(self.out, "{json}");
                let _ = self.out.flush();
            }
            Err(e) => warn!("failed to serialize report: {e}"),
        }
    }
}
