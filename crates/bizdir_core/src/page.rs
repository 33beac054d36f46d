//! Offset pagination over the filtered result set.

use serde::{Deserialize, Serialize};

/// Smallest rows-per-page value the UI accepts.
pub const MIN_PAGE_SIZE: u32 = 10;
/// Largest rows-per-page value the UI accepts.
pub const MAX_PAGE_SIZE: u32 = 200;
/// Rows per page for a fresh session.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Current page and page size of a session.
///
/// `page` is 1-indexed. Every method that knows the filtered row count
/// keeps `page` inside `[1, max_page]`.
///
/// # Examples
///
/// ```
/// use bizdir_core::PageState;
///
/// let mut page = PageState::new(50);
/// page.go_to(4);
/// assert_eq!(page.clamp(105), 3);
/// assert_eq!(page.offset(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredPageState")]
pub struct PageState {
    page: u32,
    page_size: u32,
}

/// Unchecked wire form, bounded on the way in.
#[derive(Deserialize)]
struct StoredPageState {
    page: u32,
    page_size: u32,
}

impl From<StoredPageState> for PageState {
    fn from(stored: StoredPageState) -> Self {
        let mut state = Self::new(stored.page_size);
        state.go_to(stored.page.max(1));
        state
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// Starts at page 1 with `page_size` bounded to the accepted range.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Current 1-indexed page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Changes the page size; the page is re-clamped on the next count.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    }

    /// Requests a page without bounds checking. Call [`Self::clamp`] before use.
    pub fn go_to(&mut self, page: u32) {
        self.page = page;
    }

    /// `max(1, ceil(filtered_rows / page_size))`.
    pub fn max_page(&self, filtered_rows: u64) -> u32 {
        let size = u64::from(self.page_size);
        let pages = filtered_rows.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Pulls the page back into `[1, max_page]` and returns it.
    pub fn clamp(&mut self, filtered_rows: u64) -> u32 {
        self.page = self.page.clamp(1, self.max_page(filtered_rows));
        self.page
    }

    /// Advances one page unless already on the last page.
    pub fn next(&mut self, filtered_rows: u64) -> bool {
        self.clamp(filtered_rows);
        if self.page < self.max_page(filtered_rows) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Steps back one page unless already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Rows skipped before the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Clamps and describes the visible slice for the pager line.
    pub fn window(&mut self, filtered_rows: u64) -> PageWindow {
        let page = self.clamp(filtered_rows);
        let offset = self.offset();
        PageWindow {
            page,
            max_page: self.max_page(filtered_rows),
            start_row: if filtered_rows == 0 { 0 } else { offset + 1 },
            end_row: filtered_rows.min(offset + u64::from(self.page_size)),
            filtered_rows,
        }
    }
}

/// Position of the current page within the filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    /// Current page after clamping
    pub page: u32,
    /// Last valid page
    pub max_page: u32,
    /// 1-based index of the first visible row, 0 when empty
    pub start_row: u64,
    /// 1-based index of the last visible row
    pub end_row: u64,
    /// Filtered row count the window was derived from
    pub filtered_rows: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_page_formula() {
        let page = PageState::new(50);
        assert_eq!(page.max_page(0), 1);
        assert_eq!(page.max_page(1), 1);
        assert_eq!(page.max_page(50), 1);
        assert_eq!(page.max_page(51), 2);
        assert_eq!(page.max_page(105), 3);
    }

    #[test]
    fn test_page_size_is_bounded() {
        assert_eq!(PageState::new(1).page_size(), MIN_PAGE_SIZE);
        assert_eq!(PageState::new(5000).page_size(), MAX_PAGE_SIZE);
        let mut page = PageState::default();
        page.set_page_size(120);
        assert_eq!(page.page_size(), 120);
    }

    #[test]
    fn test_deserialized_page_size_is_bounded() {
        let page: PageState = serde_json::from_str(r#"{"page":0,"page_size":0}"#).unwrap();
        assert_eq!(page.page_size(), MIN_PAGE_SIZE);
        assert_eq!(page.page(), 1);
        assert_eq!(page.max_page(0), 1);

        let page: PageState = serde_json::from_str(r#"{"page":7,"page_size":9000}"#).unwrap();
        assert_eq!(page.page_size(), MAX_PAGE_SIZE);
        assert_eq!(page.page(), 7);
    }

    #[test]
    fn test_clamp_out_of_range_requests() {
        let mut page = PageState::new(50);
        for requested in [0, 1, 2, 3, 4, 99, u32::MAX] {
            page.go_to(requested);
            let clamped = page.clamp(105);
            assert!((1..=3).contains(&clamped), "{requested} -> {clamped}");
        }
        page.go_to(4);
        assert_eq!(page.clamp(105), 3);
        page.go_to(0);
        assert_eq!(page.clamp(105), 1);
    }

    #[test]
    fn test_next_and_prev_stop_at_boundaries() {
        let mut page = PageState::new(50);
        assert!(!page.prev());
        assert!(page.next(105));
        assert!(page.next(105));
        assert_eq!(page.page(), 3);
        assert!(!page.next(105));
        assert_eq!(page.page(), 3);
        assert!(page.prev());
        assert_eq!(page.page(), 2);
    }

    #[test]
    fn test_shrinking_result_set_clamps_page() {
        let mut page = PageState::new(10);
        page.go_to(8);
        assert_eq!(page.clamp(25), 3);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_window_for_last_partial_page() {
        let mut page = PageState::new(50);
        page.go_to(3);
        let window = page.window(105);
        assert_eq!(
            window,
            PageWindow {
                page: 3,
                max_page: 3,
                start_row: 101,
                end_row: 105,
                filtered_rows: 105,
            }
        );
    }

    #[test]
    fn test_window_when_empty() {
        let mut page = PageState::new(50);
        page.go_to(2);
        let window = page.window(0);
        assert_eq!(window.page, 1);
        assert_eq!(window.start_row, 0);
        assert_eq!(window.end_row, 0);
    }
}
