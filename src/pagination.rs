//! Page-count arithmetic and the visible window of page links.

/// Maximum number of numbered page links shown at once.
pub const WINDOW: u32 = 5;

/// Number of pages for `total_articles` matches at `page_size` per page.
///
/// A missing count (the provider omitted it, or reported a falsy value) is
/// replaced by `default_total`. This is a guess, not a guarantee: with the
/// stock settings it always yields 10 pages.
pub fn total_pages(total_articles: Option<u64>, page_size: u32, default_total: u64) -> u32 {
    let total = total_articles.filter(|n| *n > 0).unwrap_or(default_total);
    let pages = total.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The numbered page links to offer around `current`.
///
/// Shows the first five pages near the start, the last five near the end,
/// and otherwise `current` centred with two pages either side. The window
/// never starts before page 1, so short page lists are shown in full.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    let (current, total) = (i64::from(current), i64::from(total));
    let count = total.min(i64::from(WINDOW));
    let first: i64 = if current <= 3 {
        1
    } else if current >= total - 2 {
        total - 4
    } else {
        current - 2
    };
    let first = first.max(1);

    (0..count)
        .map(|i| first + i)
        .filter(|p| *p >= 1 && *p <= total)
        .filter_map(|p| u32::try_from(p).ok())
        .collect()
}

pub fn has_previous(current: u32) -> bool {
    current > 1
}

pub fn has_next(current: u32, total: u32) -> bool {
    current < total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(Some(54), 10, 100), 6);
        assert_eq!(total_pages(Some(50), 10, 100), 5);
        assert_eq!(total_pages(Some(1), 10, 100), 1);
    }

    #[test]
    fn test_total_pages_defaults_when_missing() {
        assert_eq!(total_pages(None, 10, 100), 10);
        assert_eq!(total_pages(Some(0), 10, 100), 10);
    }

    #[test]
    fn test_total_pages_zero_page_size() {
        assert_eq!(total_pages(Some(7), 0, 100), 7);
    }

    #[test]
    fn test_window_near_start() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_middle() {
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(page_window(8, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_window_fewer_pages_than_links() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(3, 3), vec![1, 2, 3]);
        assert_eq!(page_window(4, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_window_past_the_end() {
        assert_eq!(page_window(25, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_prev_next_bounds() {
        assert!(!has_previous(1));
        assert!(has_previous(2));
        assert!(has_next(9, 10));
        assert!(!has_next(10, 10));
    }
}
