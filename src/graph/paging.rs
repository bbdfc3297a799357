//! Paging parameters for read operations

use crate::error::{LineageError, LineageResult};

/// A requested page of results.
///
/// `page_size == 0` asks for the connector's maximum page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub start_from: usize,
    pub page_size: usize,
}

impl Paging {
    pub fn new(start_from: usize, page_size: usize) -> Self {
        Self {
            start_from,
            page_size,
        }
    }

    /// The first page of the given size
    pub fn first(page_size: usize) -> Self {
        Self::new(0, page_size)
    }

    /// Resolve against the connector's maximum page size.
    pub fn resolve(self, max_page_size: usize) -> LineageResult<Self> {
        if self.page_size > max_page_size {
            return Err(LineageError::invalid(
                "page_size",
                format!(
                    "requested page size {} exceeds the maximum of {}",
                    self.page_size, max_page_size
                ),
            ));
        }
        let page_size = if self.page_size == 0 {
            max_page_size
        } else {
            self.page_size
        };
        Ok(Self::new(self.start_from, page_size))
    }

    /// Cut a page out of an ordered result list.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let take = if self.page_size == 0 {
            usize::MAX
        } else {
            self.page_size
        };
        items.into_iter().skip(self.start_from).take(take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_size_uses_maximum() {
        let paging = Paging::first(0).resolve(50).unwrap();
        assert_eq!(paging.page_size, 50);
    }

    #[test]
    fn oversized_page_is_rejected() {
        let err = Paging::first(51).resolve(50).unwrap_err();
        assert!(matches!(err, LineageError::InvalidParameter { ref parameter, .. } if parameter == "page_size"));
    }

    #[test]
    fn apply_skips_and_truncates() {
        let page = Paging::new(1, 2).apply(vec![1, 2, 3, 4]);
        assert_eq!(page, vec![2, 3]);
        assert!(Paging::new(10, 2).apply(vec![1, 2]).is_empty());
    }
}
