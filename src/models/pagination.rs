use serde::Serialize;

/// Offset-paginated result in the length-aware paginator shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub current_page: u32,
    pub data: Vec<T>,
    pub first_page_url: String,
    pub from: Option<u64>,
    pub last_page: u32,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: u32,
    pub prev_page_url: Option<String>,
    pub to: Option<u64>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, path: &str, current_page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let current_page = current_page.max(1);
        let last_page = (total.div_ceil(u64::from(per_page))).max(1) as u32;

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let first = u64::from(current_page - 1) * u64::from(per_page) + 1;
            (Some(first), Some(first + data.len() as u64 - 1))
        };

        let url = |page: u32| format!("{}?page={}", path, page);

        Self {
            current_page,
            first_page_url: url(1),
            from,
            last_page,
            last_page_url: url(last_page),
            next_page_url: (current_page < last_page).then(|| url(current_page + 1)),
            path: path.to_string(),
            per_page,
            prev_page_url: (current_page > 1).then(|| url(current_page - 1)),
            to,
            total,
            data,
        }
    }

    pub fn empty(path: &str, current_page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), path, current_page, per_page, 0)
    }

    /// Row offset of the first entry on `page` (1-based)
    pub fn offset(page: u32, per_page: u32) -> i64 {
        i64::from(page.max(1) - 1) * i64::from(per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page() {
        let page: Page<i32> = Page::empty("/api/timeline", 1, 15);
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
        assert_eq!(page.next_page_url, None);
        assert_eq!(page.prev_page_url, None);
    }

    #[test]
    fn test_middle_page_bounds() {
        let page = Page::new(vec![1, 2, 3], "/api/timeline", 2, 3, 8);
        assert_eq!(page.from, Some(4));
        assert_eq!(page.to, Some(6));
        assert_eq!(page.last_page, 3);
        assert_eq!(page.next_page_url.as_deref(), Some("/api/timeline?page=3"));
        assert_eq!(page.prev_page_url.as_deref(), Some("/api/timeline?page=1"));
        assert_eq!(page.first_page_url, "/api/timeline?page=1");
        assert_eq!(page.last_page_url, "/api/timeline?page=3");
    }

    #[test]
    fn test_offset() {
        assert_eq!(Page::<()>::offset(1, 15), 0);
        assert_eq!(Page::<()>::offset(3, 15), 30);
        assert_eq!(Page::<()>::offset(0, 15), 0);
    }
}
