//! Per-page CSS class counting.
//!
//! `count_classes` is pure; `analyze_page` adds the fetch and hands parsing
//! to a blocking thread (scraper's `Html` is not `Send`). Neither touches the
//! running totals: the census folds each page's [`ClassCounts`] itself.

use crate::acquisition::http_client::HttpClient;
use crate::error::PageError;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Count for one tracked class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub class: String,
    pub count: u64,
}

/// Class name → count, in the order the classes were configured.
///
/// Entries are never removed and counts only grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassCounts {
    entries: Vec<ClassCount>,
}

impl ClassCounts {
    /// One zero entry per distinct class; repeats keep their first position.
    pub fn zeroed(classes: &[String]) -> Self {
        Self {
            entries: unique_classes(classes)
                .into_iter()
                .map(|class| ClassCount { class, count: 0 })
                .collect(),
        }
    }

    pub fn get(&self, class: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.class == class)
            .map(|e| e.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassCount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add `n` to `class`, creating the entry at the end if it is new.
    pub fn add(&mut self, class: &str, n: u64) {
        match self.entries.iter_mut().find(|e| e.class == class) {
            Some(entry) => entry.count += n,
            None => self.entries.push(ClassCount {
                class: class.to_string(),
                count: n,
            }),
        }
    }

    /// Fold another set of counts into this one.
    pub fn merge(&mut self, other: &ClassCounts) {
        for entry in other.iter() {
            self.add(&entry.class, entry.count);
        }
    }

    /// Sum over all classes.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// Drop repeated class names, keeping the first occurrence.
pub fn unique_classes(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

/// Count, for each class, the elements whose `class` attribute carries that
/// exact token. Equivalent to `document.querySelectorAll(".name").length`:
/// matching is case-sensitive and whole-token, and an element repeating the
/// token still counts once.
pub fn count_classes(html: &str, classes: &[String]) -> ClassCounts {
    let mut counts = ClassCounts::zeroed(classes);
    let document = Html::parse_document(html);

    if let Ok(sel) = Selector::parse("[class]") {
        for el in document.select(&sel) {
            for entry in counts.entries.iter_mut() {
                if el.value().classes().any(|c| c == entry.class) {
                    entry.count += 1;
                }
            }
        }
    }

    counts
}

/// Fetch one page and count the tracked classes on it.
pub async fn analyze_page(
    client: &HttpClient,
    url: &str,
    classes: &[String],
) -> Result<ClassCounts, PageError> {
    let body = client.get_ok(url).await?;

    let classes_owned = classes.to_vec();
    tokio::task::spawn_blocking(move || count_classes(&body, &classes_owned))
        .await
        .map_err(|e| PageError::Analysis {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
