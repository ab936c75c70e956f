// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Highest page a search may be turned to.
pub const MAX_PAGE: u32 = 100;

/// Keyword and page of the search panel.
///
/// Two states name the same query when their trimmed keywords and pages
/// match; see [`same_query`](Self::same_query).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    keyword: String,
    page: u32,
}

impl SearchState {
    /// No keyword, first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A state at a given keyword and page.
    ///
    /// Pages past [`MAX_PAGE`] are clamped.
    #[must_use]
    pub fn at(keyword: impl Into<String>, page: u32) -> Self {
        Self {
            keyword: keyword.into(),
            page: page.min(MAX_PAGE),
        }
    }

    /// The keyword as typed.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The keyword with surrounding whitespace removed.
    #[must_use]
    pub fn query(&self) -> &str {
        self.keyword.trim()
    }

    /// The current page, starting at zero.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether there is anything to search for.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query().is_empty()
    }

    /// Starts a new search at page zero.
    ///
    /// Returns `true` when this names a different query than before.
    pub fn submit(&mut self, keyword: impl Into<String>) -> bool {
        let next = Self {
            keyword: keyword.into(),
            page: 0,
        };
        let changed = !self.same_query(&next);
        *self = next;
        changed
    }

    /// Moves `delta` pages forward or back.
    ///
    /// Ignored, returning `false`, when there is no keyword or the target
    /// page falls outside `0..=MAX_PAGE`.
    pub fn turn_page(&mut self, delta: i64) -> bool {
        if !self.is_active() {
            return false;
        }
        let target = i64::from(self.page) + delta;
        match u32::try_from(target) {
            Ok(page) if page <= MAX_PAGE => {
                let changed = page != self.page;
                self.page = page;
                changed
            }
            _ => false,
        }
    }

    /// Whether `other` would fetch the same results.
    #[must_use]
    pub fn same_query(&self, other: &Self) -> bool {
        self.query() == other.query() && self.page == other.page
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PAGE, SearchState};

    #[test]
    fn submit_resets_the_page() {
        let mut search = SearchState::at("abba", 4);
        assert!(search.submit("queen"), "new keyword");
        assert_eq!(search.page(), 0);
        assert_eq!(search.keyword(), "queen");
    }

    #[test]
    fn resubmitting_with_padding_is_not_a_change() {
        let mut search = SearchState::new();
        assert!(search.submit("abba"), "first submit");
        assert!(!search.submit("  abba "), "same trimmed keyword");
        assert_eq!(search.keyword(), "  abba ");
        assert_eq!(search.query(), "abba");
    }

    #[test]
    fn paging_needs_a_keyword() {
        let mut search = SearchState::new();
        assert!(!search.turn_page(1), "no keyword");
        search.submit("   ");
        assert!(!search.turn_page(1), "blank keyword");
        assert_eq!(search.page(), 0);
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut search = SearchState::new();
        search.submit("abba");
        assert!(!search.turn_page(-1), "before the first page");
        assert!(search.turn_page(1), "forward");
        assert_eq!(search.page(), 1);

        let mut search = SearchState::at("abba", MAX_PAGE);
        assert!(!search.turn_page(1), "past the last page");
        assert_eq!(search.page(), MAX_PAGE);
        assert!(search.turn_page(-100), "back to the start");
        assert_eq!(search.page(), 0);
    }

    #[test]
    fn at_clamps_the_page() {
        assert_eq!(SearchState::at("x", 500).page(), MAX_PAGE);
    }

    #[test]
    fn same_query_compares_trimmed_keywords() {
        assert!(
            SearchState::at(" a", 2).same_query(&SearchState::at("a ", 2)),
            "padding ignored"
        );
        assert!(
            !SearchState::at("a", 2).same_query(&SearchState::at("a", 3)),
            "page differs"
        );
    }
}
