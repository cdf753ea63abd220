/// One cell of the page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCell {
    Page(u32),
    Gap,
}

const FULL_STRIP_LIMIT: u32 = 7;
const EDGE_RUN: u32 = 5;

/// Ellipsis-compressed list of page indices to render, never wider than nine cells.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageCell> {
    if total <= FULL_STRIP_LIMIT {
        return (0..total).map(PageCell::Page).collect();
    }

    let last = total - 1;
    let mut cells = Vec::with_capacity(9);

    if current <= 3 {
        cells.extend((0..EDGE_RUN).map(PageCell::Page));
        cells.push(PageCell::Gap);
        cells.push(PageCell::Page(last));
    } else if current >= total - EDGE_RUN {
        cells.push(PageCell::Page(0));
        cells.push(PageCell::Gap);
        cells.extend((total - EDGE_RUN..total).map(PageCell::Page));
    } else {
        cells.push(PageCell::Page(0));
        cells.push(PageCell::Gap);
        cells.extend((current - 1..=current + 1).map(PageCell::Page));
        cells.push(PageCell::Gap);
        cells.push(PageCell::Page(last));
    }
    cells
}

/// Previous/next state for a page index within `[0, total)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub total: u32,
}

impl Pager {
    pub fn new(page: u32, total: u32) -> Self {
        Self { page, total }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.total > 0 && self.page < self.total - 1
    }

    pub fn previous(&self) -> u32 {
        self.page.saturating_sub(1)
    }

    pub fn next(&self) -> u32 {
        if self.has_next() {
            self.page + 1
        } else {
            self.page
        }
    }

    pub fn cells(&self) -> Vec<PageCell> {
        visible_pages(self.page, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::PageCell::{Gap, Page};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_strips_show_everything() {
        for current in 0..5 {
            assert_eq!(
                visible_pages(current, 5),
                vec![Page(0), Page(1), Page(2), Page(3), Page(4)]
            );
        }
        assert_eq!(visible_pages(0, 0), vec![]);
        assert_eq!(visible_pages(6, 7).len(), 7);
    }

    #[test]
    fn head_of_long_strip() {
        let expected = vec![Page(0), Page(1), Page(2), Page(3), Page(4), Gap, Page(19)];
        assert_eq!(visible_pages(0, 20), expected);
        assert_eq!(visible_pages(3, 20), expected);
    }

    #[test]
    fn tail_of_long_strip() {
        let expected = vec![Page(0), Gap, Page(15), Page(16), Page(17), Page(18), Page(19)];
        assert_eq!(visible_pages(19, 20), expected);
        assert_eq!(visible_pages(15, 20), expected);
    }

    #[test]
    fn middle_of_long_strip() {
        assert_eq!(
            visible_pages(10, 20),
            vec![Page(0), Gap, Page(9), Page(10), Page(11), Gap, Page(19)]
        );
        assert_eq!(
            visible_pages(14, 20),
            vec![Page(0), Gap, Page(13), Page(14), Page(15), Gap, Page(19)]
        );
    }

    #[test]
    fn current_is_always_visible() {
        for total in 1..40 {
            for current in 0..total {
                let cells = visible_pages(current, total);
                assert!(cells.contains(&Page(current)), "{current}/{total}");
                assert!(cells.len() <= 9);
            }
        }
    }

    #[test]
    fn pager_bounds() {
        let first = Pager::new(0, 3);
        assert!(!first.has_previous());
        assert_eq!(first.previous(), 0);
        assert!(first.has_next());

        let last = Pager::new(2, 3);
        assert!(!last.has_next());
        assert_eq!(last.next(), 2);
        assert!(last.has_previous());

        let empty = Pager::new(0, 0);
        assert!(!empty.has_next());
        assert!(!empty.has_previous());
    }
}
