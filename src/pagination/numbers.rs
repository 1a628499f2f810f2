use std::fmt;
use std::iter::once;

/// One slot in a compact page list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// How the numbered list places pages around the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// Full blocks of `2 * window` pages next to either terminal page
    Anchored,
    /// Only `current ± window`, plus the first and last page
    Centred,
}

impl PageLayout {
    pub fn items(self, current: u32, last: u32, window: u32) -> Vec<PageItem> {
        match self {
            PageLayout::Anchored => page_numbers(current, last, window),
            PageLayout::Centred => centred_page_numbers(current, last, window),
        }
    }
}

/// Compact page list around `current` with `window` neighbours on each side.
///
/// First and last page are always present and every run of skipped pages
/// becomes one ellipsis. Near the start the list runs from page 1 to at
/// least page `2 * window` and always reaches `current + window`; near the
/// end it shows the last `2 * window` pages. When `last <= 2 * window + 1`
/// every page is listed.
pub fn page_numbers(current: u32, last: u32, window: u32) -> Vec<PageItem> {
    if last <= 1 {
        return vec![PageItem::Page(1)];
    }

    let window = window.max(1);
    let current = current.clamp(1, last);
    let span = 2 * window;

    let shown: Vec<u32> = if last <= span + 1 {
        (1..=last).collect()
    } else if current <= window + 1 {
        let upper = span.max(current + window).min(last - 1);
        (1..=upper).chain(once(last)).collect()
    } else if current + window >= last {
        once(1).chain(last - span + 1..=last).collect()
    } else {
        once(1)
            .chain(current - window..=current + window)
            .chain(once(last))
            .collect()
    };

    with_ellipses(shown)
}

/// First page, `current ± window` clipped to `2..=last - 1`, last page.
pub fn centred_page_numbers(current: u32, last: u32, window: u32) -> Vec<PageItem> {
    if last <= 1 {
        return vec![PageItem::Page(1)];
    }

    let current = current.clamp(1, last);
    let low = current.saturating_sub(window).max(2);
    let high = current.saturating_add(window).min(last - 1);

    with_ellipses(once(1).chain(low..=high).chain(once(last)).collect())
}

fn with_ellipses(shown: Vec<u32>) -> Vec<PageItem> {
    let mut items = Vec::with_capacity(shown.len() + 2);
    let mut previous = 0;
    for page in shown {
        if previous != 0 && page > previous + 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = page;
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageItem::{Ellipsis as E, Page as P};

    #[test]
    fn small_ranges_list_every_page() {
        for last in 1..=5 {
            for current in 1..=last {
                let expected: Vec<_> = (1..=last).map(P).collect();
                assert_eq!(page_numbers(current, last, 2), expected, "current={} last={}", current, last);
            }
        }
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(page_numbers(1, 10, 2), vec![P(1), P(2), P(3), P(4), E, P(10)]);
    }

    #[test]
    fn middle_page_of_ten() {
        assert_eq!(page_numbers(5, 10, 2), vec![P(1), E, P(3), P(4), P(5), P(6), P(7), E, P(10)]);
    }

    #[test]
    fn near_end_never_duplicates_last_page() {
        assert_eq!(page_numbers(8, 10, 2), vec![P(1), E, P(7), P(8), P(9), P(10)]);
        assert_eq!(page_numbers(10, 10, 2), vec![P(1), E, P(7), P(8), P(9), P(10)]);
    }

    #[test]
    fn window_touching_first_page_has_no_ellipsis() {
        assert_eq!(page_numbers(4, 10, 2), vec![P(1), P(2), P(3), P(4), P(5), P(6), E, P(10)]);
    }

    #[test]
    fn start_block_reaches_current_neighbours() {
        assert_eq!(page_numbers(3, 10, 2), vec![P(1), P(2), P(3), P(4), P(5), E, P(10)]);
        assert_eq!(page_numbers(2, 10, 2), vec![P(1), P(2), P(3), P(4), E, P(10)]);
    }

    #[test]
    fn centred_narrow_window() {
        assert_eq!(centred_page_numbers(1, 10, 1), vec![P(1), P(2), E, P(10)]);
        assert_eq!(centred_page_numbers(2, 10, 1), vec![P(1), P(2), P(3), E, P(10)]);
        assert_eq!(centred_page_numbers(5, 10, 1), vec![P(1), E, P(4), P(5), P(6), E, P(10)]);
        assert_eq!(centred_page_numbers(9, 10, 1), vec![P(1), E, P(8), P(9), P(10)]);
        assert_eq!(centred_page_numbers(10, 10, 1), vec![P(1), E, P(9), P(10)]);
        assert_eq!(centred_page_numbers(2, 3, 1), vec![P(1), P(2), P(3)]);
        assert_eq!(centred_page_numbers(1, 1, 1), vec![P(1)]);
        assert_eq!(centred_page_numbers(1, 2, 1), vec![P(1), P(2)]);
    }

    #[test]
    fn centred_always_shows_neighbours() {
        for last in 2..=30 {
            for current in 1..=last {
                let pages: Vec<u32> = centred_page_numbers(current, last, 1)
                    .into_iter()
                    .filter_map(|i| match i {
                        P(n) => Some(n),
                        E => None,
                    })
                    .collect();
                assert!(pages.windows(2).all(|w| w[0] < w[1]));
                for n in current.saturating_sub(1).max(1)..=(current + 1).min(last) {
                    assert!(pages.contains(&n), "current={} last={} missing {}", current, last, n);
                }
            }
        }
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        assert_eq!(page_numbers(0, 10, 2), page_numbers(1, 10, 2));
        assert_eq!(page_numbers(99, 10, 2), page_numbers(10, 10, 2));
    }

    #[test]
    fn every_page_appears_once_and_in_order() {
        for last in 1..=40 {
            for current in 1..=last {
                let pages: Vec<u32> = page_numbers(current, last, 2)
                    .into_iter()
                    .filter_map(|i| match i {
                        P(n) => Some(n),
                        E => None,
                    })
                    .collect();
                assert!(pages.windows(2).all(|w| w[0] < w[1]));
                assert_eq!(pages.first(), Some(&1));
                assert_eq!(pages.last(), Some(&last));
                assert!(pages.contains(&current));
            }
        }
    }
}
