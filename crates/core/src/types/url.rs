//! Public URL construction for bucket objects

/// Builds public download URLs under a fixed base such as
/// `https://f005.backblazeb2.com/file/<bucket>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let trimmed = base.trim_end_matches('/');
        Self {
            base: format!("{}/", trimmed),
        }
    }

    /// The base URL, always ending in a single `/`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Joins path segments under the base URL.
    ///
    /// Blank segments are dropped, slashes at either end of a segment are
    /// trimmed, and duplicate slashes are collapsed except after a scheme's `:`.
    pub fn join(&self, segments: &[&str]) -> String {
        collapse_slashes(&format!("{}{}", self.base, Self::join_path(segments)))
    }

    /// Joins path segments without a base (used for object keys)
    pub fn join_path(segments: &[&str]) -> String {
        segments
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn collapse_slashes(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut prev: Option<char> = None;
    let mut before_prev: Option<char> = None;

    for c in url.chars() {
        let duplicate = c == '/' && prev == Some('/') && before_prev.is_some_and(|b| b != ':');
        if !duplicate {
            out.push(c);
            before_prev = prev;
            prev = Some(c);
        }
    }

    out
}
