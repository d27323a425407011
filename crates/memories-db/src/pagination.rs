use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid pagination")]
pub struct InvalidPagination;

/// A validated 1-based page request.
///
/// There is no upper bound on `page_size`; callers that need one must clamp
/// before constructing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Result<Self, InvalidPagination> {
        if page < 1 || page_size < 1 {
            return Err(InvalidPagination);
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or(InvalidPagination)?;
        Ok(Self {
            page,
            page_size,
            offset,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// One slice of an ordered result set plus the size of the whole set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 7).unwrap().offset(), 14);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert_eq!(PageRequest::new(0, 10), Err(InvalidPagination));
        assert_eq!(PageRequest::new(1, 0), Err(InvalidPagination));
        assert_eq!(PageRequest::new(-4, 10), Err(InvalidPagination));
        assert_eq!(PageRequest::new(2, -1), Err(InvalidPagination));
    }

    #[test]
    fn rejects_overflowing_offset() {
        assert_eq!(PageRequest::new(i64::MAX, 2), Err(InvalidPagination));
    }

    #[test]
    fn large_page_size_is_allowed() {
        let req = PageRequest::new(1, i64::MAX).unwrap();
        assert_eq!(req.page_size(), i64::MAX);
    }
}
