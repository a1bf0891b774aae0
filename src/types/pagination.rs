use handle_errors::Error;
use serde::Serialize;
use std::collections::HashMap;

/// Every listing is cut into pages of this many questions.
pub const QUESTIONS_PER_PAGE: u32 = 10;

/// Pagination is extracted from the query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            per_page: QUESTIONS_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Page `0` lies before the first page and selects nothing.
    pub fn limit(&self) -> i64 {
        if self.page == 0 {
            0
        } else {
            i64::from(self.per_page)
        }
    }

    /// Rows skipped before this page starts.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Cuts an already ordered sequence down to this page. Pages outside the
    /// sequence come back empty.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items
            .iter()
            .skip(start)
            .take(usize::try_from(self.limit()).unwrap_or_default())
            .cloned()
            .collect()
    }
}

/// One page of results plus the size of the whole result set.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Extract the page from the query parameters
/// # Example query
/// `/questions?page=2` returns questions 11 through 20. Without a `page`
/// parameter the first page is returned. `page=0` is accepted and yields an
/// empty page.
pub fn extract_pagination(params: &HashMap<String, String>) -> Result<Pagination, Error> {
    match params.get("page") {
        Some(page) => Ok(Pagination {
            page: page.trim().parse::<u32>().map_err(Error::ParseError)?,
            ..Pagination::default()
        }),
        None => Ok(Pagination::default()),
    }
}

#[cfg(test)]
mod pagination_tests {
    use super::*;

    fn params(page: &str) -> HashMap<String, String> {
        let mut query = HashMap::new();
        query.insert("page".to_string(), page.to_string());
        query
    }

    #[test]
    fn defaults_to_first_page() {
        let p = extract_pagination(&HashMap::new()).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn offset_follows_page_number() {
        let p = extract_pagination(&params("3")).unwrap();
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn rejects_non_numeric_pages() {
        assert!(matches!(
            extract_pagination(&params("two")),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            extract_pagination(&params("-1")),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn pages_cover_every_item_exactly_once() {
        let items: Vec<u32> = (1..=23).collect();
        let mut seen = Vec::new();
        for page in 1..=4 {
            let slice = Pagination {
                page,
                ..Pagination::default()
            }
            .slice(&items);
            assert!(slice.len() <= QUESTIONS_PER_PAGE as usize);
            seen.extend(slice);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn page_zero_selects_nothing() {
        let p = extract_pagination(&params("0")).unwrap();
        assert_eq!(p.page, 0);
        assert_eq!(p.limit(), 0);
        assert_eq!(p.offset(), 0);
        let items: Vec<u32> = (1..=5).collect();
        assert!(p.slice(&items).is_empty());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=5).collect();
        let p = Pagination {
            page: 2,
            ..Pagination::default()
        };
        assert!(p.slice(&items).is_empty());
    }
}
