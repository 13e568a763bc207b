use std::ops::Range;

/// Number of articles shown on a single page.
pub const PAGE_SIZE: usize = 6;

/// Page bookkeeping over an in-memory sequence.
///
/// Pages are 1-based. The page index always stays within
/// `1..=max(1, total_pages)`, so an empty sequence still sits on page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
  page: usize,
  len: usize,
  page_size: usize,
}

impl Default for Paginator {
  fn default() -> Self {
    Self::new(PAGE_SIZE)
  }
}

impl Paginator {
  pub fn new(page_size: usize) -> Self {
    Self { page: 1, len: 0, page_size: page_size.max(1) }
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn total_pages(&self) -> usize {
    self.len.div_ceil(self.page_size)
  }

  pub fn has_next(&self) -> bool {
    self.page < self.total_pages()
  }

  pub fn has_previous(&self) -> bool {
    self.page > 1
  }

  /// Moves forward one page. Returns `false` when already on the last page.
  pub fn next(&mut self) -> bool {
    if self.has_next() {
      self.page += 1;
      true
    } else {
      false
    }
  }

  /// Moves back one page. Returns `false` when already on the first page.
  pub fn previous(&mut self) -> bool {
    if self.has_previous() {
      self.page -= 1;
      true
    } else {
      false
    }
  }

  /// Updates the sequence length and pulls the page back into range.
  pub fn set_len(&mut self, len: usize) {
    self.len = len;
    self.page = self.page.clamp(1, self.total_pages().max(1));
  }

  /// Replaces the sequence and starts over from the first page.
  pub fn reset(&mut self, len: usize) {
    self.len = len;
    self.page = 1;
  }

  /// Index range of the current page within the whole sequence.
  pub fn range(&self) -> Range<usize> {
    let start = ((self.page - 1) * self.page_size).min(self.len);
    let end = (self.page * self.page_size).min(self.len);
    start..end
  }

  pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    let range = self.range();
    let end = range.end.min(items.len());
    &items[range.start.min(end)..end]
  }

  pub fn label(&self) -> String {
    format!("Page {} of {}", self.page, self.total_pages())
  }
}
