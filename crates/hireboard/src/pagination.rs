use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Bounds applied to caller supplied page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_num: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page_num: u32, page_size: u32) -> Self {
        Self {
            page_num,
            page_size,
        }
    }

    pub fn first(limits: &PageLimits) -> Self {
        Self::new(0, limits.default_page_size)
    }

    /// Fill in missing parts from the limits. Bounds are left to [`PageRequest::validate`].
    pub fn with_defaults(
        page_num: Option<u32>,
        page_size: Option<u32>,
        limits: &PageLimits,
    ) -> Self {
        Self::new(
            page_num.unwrap_or(0),
            page_size.unwrap_or(limits.default_page_size),
        )
    }

    pub fn validate(&self, limits: &PageLimits) -> Result<(), ServiceError> {
        if self.page_size == 0 {
            return Err(ServiceError::InvalidPage {
                reason: "page_size must be at least 1".to_string(),
            });
        }
        if self.page_size > limits.max_page_size {
            return Err(ServiceError::InvalidPage {
                reason: format!("page_size must not exceed {}", limits.max_page_size),
            });
        }
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.page_num as usize * self.page_size as usize
    }
}

/// A single page of results plus the totals needed to render pagers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_num: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice an already ordered result set.
    pub fn from_ordered(items: Vec<T>, request: &PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let size = u64::from(request.page_size.max(1));
        let total_pages = total_elements.div_ceil(size) as u32;
        let content = items
            .into_iter()
            .skip(request.offset())
            .take(request.page_size as usize)
            .collect();

        Self {
            content,
            page_num: request.page_num,
            page_size: request.page_size,
            total_elements,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_window() {
        let page = Page::from_ordered((1..=7).collect::<Vec<u32>>(), &PageRequest::new(1, 3));
        assert_eq!(page.content, vec![4, 5, 6]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_past_end_is_empty_with_totals() {
        let page = Page::from_ordered(vec!['a', 'b'], &PageRequest::new(4, 2));
        assert!(page.is_empty());
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn defaults_fill_gaps_and_bounds_are_validated() {
        let limits = PageLimits {
            default_page_size: 5,
            max_page_size: 20,
        };
        let request = PageRequest::with_defaults(None, None, &limits);
        assert_eq!(request, PageRequest::new(0, 5));
        assert!(request.validate(&limits).is_ok());

        assert!(matches!(
            PageRequest::with_defaults(Some(0), Some(0), &limits).validate(&limits),
            Err(ServiceError::InvalidPage { .. })
        ));
        assert!(matches!(
            PageRequest::with_defaults(Some(0), Some(21), &limits).validate(&limits),
            Err(ServiceError::InvalidPage { .. })
        ));
    }
}
