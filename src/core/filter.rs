//! Search over the shortcut list.
//!
//! Two modes:
//! - `substring` - case-insensitive match on name or path, list order kept
//! - `fuzzy` - nucleo fuzzy matching on "name path", best match first

use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher};
use serde::{Deserialize, Serialize};

use super::Shortcut;

/// How the search box matches shortcuts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Substring,
    Fuzzy,
}

/// Indices of `shortcuts` matching `query`.
///
/// An empty query matches everything in list order.
pub fn filter_shortcuts(shortcuts: &[Shortcut], query: &str, mode: SearchMode) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..shortcuts.len()).collect();
    }

    match mode {
        SearchMode::Substring => substring_matches(shortcuts, query),
        SearchMode::Fuzzy => fuzzy_matches(shortcuts, query),
    }
}

/// Whether `shortcut` contains `query` in its name or path, ignoring case.
pub fn matches_substring(shortcut: &Shortcut, query: &str) -> bool {
    let query = query.to_lowercase();
    shortcut.name.to_lowercase().contains(&query) || shortcut.path.to_lowercase().contains(&query)
}

fn substring_matches(shortcuts: &[Shortcut], query: &str) -> Vec<usize> {
    shortcuts
        .iter()
        .enumerate()
        .filter(|(_, s)| matches_substring(s, query))
        .map(|(i, _)| i)
        .collect()
}

/// Match candidate carrying its position in the list.
struct Candidate {
    index: usize,
    text: String,
}

impl AsRef<str> for Candidate {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

fn fuzzy_matches(shortcuts: &[Shortcut], query: &str) -> Vec<usize> {
    let mut matcher = Matcher::new(Config::DEFAULT.match_paths());
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

    let candidates = shortcuts
        .iter()
        .enumerate()
        .map(|(index, s)| Candidate { index, text: s.match_text() });

    let mut scored = pattern.match_list(candidates, &mut matcher);
    // Stable sort keeps list order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(c, _)| c.index).collect()
}
