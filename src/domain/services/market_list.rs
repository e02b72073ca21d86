//! Market list projection - text filter, pagination and page-button window
//! over a bulk market-data snapshot.

use crate::domain::entities::market::MarketEntry;
use std::num::NonZeroUsize;
use tracing::debug;

/// Maximum number of page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

/// Entries whose name or symbol contains `query`, ignoring case.
/// An empty query matches everything.
pub fn filter<'a>(entries: &'a [MarketEntry], query: &str) -> Vec<&'a MarketEntry> {
    let needle = query.to_lowercase();
    entries.iter().filter(|entry| entry.matches(&needle)).collect()
}

/// Slice of `items` for the 1-based `page`.
///
/// Page 0 is treated as page 1; pages past the end yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, page: usize) -> &[T] {
    let size = page_size.get();
    let page = page.max(1);
    let start = (page - 1).saturating_mul(size).min(items.len());
    let end = page.saturating_mul(size).min(items.len());
    &items[start..end]
}

pub fn total_pages(item_count: usize, page_size: NonZeroUsize) -> usize {
    let size = page_size.get();
    (item_count + size - 1) / size
}

/// Page numbers to render as buttons.
///
/// Shows pages `1..=min(total, 5)` until the current page passes 3 on a list
/// with more than 5 pages; then the window slides to keep `current` in the
/// middle, stopping at `total`.
pub fn page_window(total_pages: usize, current: usize) -> Vec<usize> {
    let count = total_pages.min(PAGE_WINDOW);
    if count == 0 {
        return Vec::new();
    }

    let start = if current > 3 && total_pages > PAGE_WINDOW {
        (current - 2).min(total_pages - (PAGE_WINDOW - 1))
    } else {
        1
    };

    (start..start + count).collect()
}

/// A visible row together with its 1-based rank in the filtered list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub entry: &'a MarketEntry,
}

/// Filtered, paginated view over one market snapshot.
///
/// The filtered set is always recomputed from the full snapshot, and every
/// query change sends the view back to page 1.
#[derive(Debug, Clone)]
pub struct MarketList {
    source: Vec<MarketEntry>,
    query: String,
    filtered: Vec<usize>,
    page: usize,
    page_size: NonZeroUsize,
}

impl MarketList {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            source: Vec::new(),
            query: String::new(),
            filtered: Vec::new(),
            page: 1,
            page_size,
        }
    }

    /// Swap in a freshly fetched snapshot, keeping the current query
    pub fn replace_snapshot(&mut self, entries: Vec<MarketEntry>) {
        self.source = entries;
        self.page = 1;
        self.recompute();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.page = 1;
        self.recompute();
    }

    fn recompute(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches(&needle))
            .map(|(i, _)| i)
            .collect();

        debug!(
            query = %self.query,
            total = self.source.len(),
            matched = self.filtered.len(),
            "Market list filtered"
        );
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    /// Highest page the view may move to (1 even for an empty result)
    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn filtered(&self) -> Vec<&MarketEntry> {
        self.filtered.iter().map(|&i| &self.source[i]).collect()
    }

    /// Rows on the current page
    pub fn visible(&self) -> Vec<RankedEntry<'_>> {
        let offset = (self.page - 1) * self.page_size.get();
        paginate(&self.filtered, self.page_size, self.page)
            .iter()
            .enumerate()
            .map(|(i, &source_index)| RankedEntry {
                rank: offset + i + 1,
                entry: &self.source[source_index],
            })
            .collect()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`; out-of-range requests leave the view unchanged
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if (1..=self.last_page()).contains(&page) {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn page_window(&self) -> Vec<usize> {
        page_window(self.total_pages(), self.page)
    }

    /// Header line, e.g. "Page 2 of 5 (100 coins)"
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} ({} coins)",
            self.page,
            self.last_page(),
            self.filtered.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: &str, name: &str) -> MarketEntry {
        MarketEntry {
            id: name.to_lowercase(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            price: Some(1.0),
            change_24h: None,
            market_cap: None,
            volume: None,
            image: None,
        }
    }

    fn snapshot(n: usize) -> Vec<MarketEntry> {
        (0..n)
            .map(|i| entry(&format!("c{}", i), &format!("Coin {}", i)))
            .collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_filter_empty_query_returns_everything() {
        let entries = snapshot(7);
        assert_eq!(filter(&entries, "").len(), 7);
    }

    #[test]
    fn test_filter_matches_name_or_symbol_case_insensitively() {
        let entries = vec![
            entry("btc", "Bitcoin"),
            entry("eth", "Ethereum"),
            entry("sui", "Sui"),
            entry("wbtc", "Wrapped Bitcoin"),
        ];

        let by_symbol: Vec<&str> = filter(&entries, "BTC").iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(by_symbol, vec!["btc", "wbtc"]);

        let by_name: Vec<&str> = filter(&entries, "ether").iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(by_name, vec!["eth"]);
    }

    #[test]
    fn test_filter_results_are_subset_and_match() {
        let entries = vec![
            entry("btc", "Bitcoin"),
            entry("eth", "Ethereum"),
            entry("sol", "Solana"),
            entry("usdt", "Tether"),
        ];
        for query in ["", "t", "ET", "zzz", "coin", "S"] {
            let result = filter(&entries, query);
            let needle = query.to_lowercase();
            for found in &result {
                assert!(entries.contains(*found));
                assert!(
                    found.name.to_lowercase().contains(&needle)
                        || found.symbol.to_lowercase().contains(&needle)
                );
            }
        }
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<usize> = (1..=45).collect();
        assert_eq!(paginate(&items, size(20), 1), &items[0..20]);
        assert_eq!(paginate(&items, size(20), 3), &items[40..45]);
        assert!(paginate(&items, size(20), 4).is_empty());
        assert_eq!(paginate(&items, size(20), 0), &items[0..20]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, size(20)), 0);
        assert_eq!(total_pages(20, size(20)), 1);
        assert_eq!(total_pages(21, size(20)), 2);
        assert_eq!(total_pages(100, size(20)), 5);
    }

    #[test]
    fn test_page_window_at_start() {
        assert_eq!(page_window(10, 1), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(10, 3), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 3), vec![1, 2, 3]);
        assert_eq!(page_window(5, 5), vec![1, 2, 3, 4, 5]);
        assert!(page_window(0, 1).is_empty());
    }

    #[test]
    fn test_page_window_slides_and_clamps() {
        assert_eq!(page_window(10, 4), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(10, 7), vec![5, 6, 7, 8, 9]);
        assert_eq!(page_window(10, 9), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(6, 6), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_page_window_never_exceeds_total_or_repeats() {
        for total in 1..=12 {
            for current in 1..=total {
                let window = page_window(total, current);
                assert!(window.len() <= PAGE_WINDOW);
                assert!(window.iter().all(|&p| p >= 1 && p <= total));
                assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
                assert!(window.contains(&current));
            }
        }
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut list = MarketList::new(size(20));
        list.replace_snapshot(snapshot(100));
        assert_eq!(list.total_pages(), 5);

        assert!(list.go_to_page(5));
        assert_eq!(list.page(), 5);

        list.set_query("Coin 1");
        assert_eq!(list.page(), 1);
        assert_eq!(list.filtered_len(), 11); // Coin 1, Coin 10..19
        assert_eq!(list.visible().len(), 11);

        list.go_to_page(1);
        list.set_query("");
        assert_eq!(list.page(), 1);
        assert_eq!(list.filtered_len(), 100);
    }

    #[test]
    fn test_filter_is_not_cumulative() {
        let mut list = MarketList::new(size(20));
        list.replace_snapshot(vec![entry("btc", "Bitcoin"), entry("eth", "Ethereum")]);

        list.set_query("btc");
        assert_eq!(list.filtered_len(), 1);
        list.set_query("eth");
        assert_eq!(list.filtered_len(), 1);
        assert_eq!(list.filtered()[0].symbol, "eth");
    }

    #[test]
    fn test_navigation_bounds() {
        let mut list = MarketList::new(size(20));
        list.replace_snapshot(snapshot(41));

        assert!(!list.prev_page());
        assert!(list.next_page());
        assert!(list.next_page());
        assert!(!list.next_page());
        assert_eq!(list.page(), 3);
        assert!(!list.go_to_page(4));
        assert!(!list.go_to_page(0));
        assert_eq!(list.page(), 3);
    }

    #[test]
    fn test_visible_rows_carry_rank() {
        let mut list = MarketList::new(size(20));
        list.replace_snapshot(snapshot(45));
        list.go_to_page(3);

        let rows = list.visible();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].rank, 41);
        assert_eq!(rows[0].entry.symbol, "c40");
        assert_eq!(rows[4].rank, 45);
    }

    #[test]
    fn test_summary_for_empty_result() {
        let mut list = MarketList::new(size(20));
        list.replace_snapshot(snapshot(3));
        list.set_query("nothing matches");
        assert_eq!(list.summary(), "Page 1 of 1 (0 coins)");
        assert!(list.visible().is_empty());
        assert!(list.page_window().is_empty());
    }

    #[test]
    fn test_replace_snapshot_keeps_query_and_resets_page() {
        let mut list = MarketList::new(size(2));
        list.replace_snapshot(snapshot(10));
        list.set_query("coin");
        list.go_to_page(4);

        list.replace_snapshot(snapshot(3));
        assert_eq!(list.query(), "coin");
        assert_eq!(list.page(), 1);
        assert_eq!(list.filtered_len(), 3);
    }
}
