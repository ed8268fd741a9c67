//! Sorted, paginated view over a fetched record set

use super::sort::Comparator;

/// Records of one list page, their sort order, and the current page.
///
/// `records` keeps server order; `order` is a stable permutation of its
/// indices under the comparator. `page` always lies in `1..=total_pages()`.
pub struct ListState<T> {
    records: Vec<T>,
    order: Vec<usize>,
    comparator: Comparator<T>,
    page: usize,
    page_size: usize,
}

impl<T> ListState<T> {
    pub fn new(comparator: Comparator<T>, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            order: Vec::new(),
            comparator,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace all records, re-sort, and pull the page back into range.
    ///
    /// A page that is still valid is kept as-is.
    pub fn replace_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.resort();
        self.page = self.clamp(self.page);
    }

    pub fn set_comparator(&mut self, comparator: Comparator<T>) {
        self.comparator = comparator;
        self.resort();
    }

    fn resort(&mut self) {
        let records = &self.records;
        let comparator = &self.comparator;
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&a, &b| comparator(&records[a], &records[b]));
        self.order = order;
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }

    /// Raw records in server order
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// All records in sorted order
    pub fn sorted(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().map(move |&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; an empty list still has one (empty) page
    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size).max(1)
    }

    /// Move to page `n`, clamped into the valid range. Returns the new page.
    pub fn set_page(&mut self, n: usize) -> usize {
        self.page = self.clamp(n);
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.page.saturating_sub(1))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Records on the current page, in sorted order
    pub fn visible(&self) -> Vec<&T> {
        let start = (self.page - 1) * self.page_size;
        self.order
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.records[i])
            .collect()
    }

    /// 1-based row number across pages for the `index`-th visible row
    pub fn row_number(&self, index: usize) -> usize {
        (self.page - 1) * self.page_size + index + 1
    }
}

impl<T> std::fmt::Debug for ListState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListState")
            .field("records", &self.records.len())
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .finish()
    }
}
