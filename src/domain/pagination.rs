use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 100;

/// ページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// 0ページ目は1ページ目として扱う。1ページあたりの件数は1〜MAX_PER_PAGEに丸める。
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// 総件数からこのリクエストが指す範囲を計算する
    ///
    /// - last_page = ceil(total / per_page)、ただし最低1
    /// - 最終ページを超えた指定は空の範囲になり、current_pageは最終ページ
    pub fn window(&self, total: u64) -> PageWindow {
        let per_page = u64::from(self.per_page);
        let last_page = total.div_ceil(per_page).max(1);
        let requested = u64::from(self.page);

        if requested > last_page {
            return PageWindow {
                current_page: last_page,
                last_page,
                offset: total,
                limit: 0,
            };
        }

        PageWindow {
            current_page: requested,
            last_page,
            offset: (requested - 1) * per_page,
            limit: per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

/// ページ範囲（オフセット・件数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: u64,
    pub last_page: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }

    /// メモリ上のスライスに範囲を適用する
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

/// ページングされた結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, window: PageWindow, total: u64) -> Self {
        Self {
            items,
            current_page: window.current_page,
            last_page: window.last_page,
            per_page: request.per_page(),
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_window() {
        let window = PageRequest::new(1, 10).window(25);
        assert_eq!(window.current_page, 1);
        assert_eq!(window.last_page, 3);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 10);
    }

    #[test]
    fn test_last_partial_page() {
        let window = PageRequest::new(3, 10).window(25);
        assert_eq!(window.offset, 20);
        assert_eq!(window.slice(&(0..25).collect::<Vec<_>>()), vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_page_past_end_is_empty_and_reports_last_page() {
        let window = PageRequest::new(7, 10).window(25);
        assert!(window.is_empty());
        assert_eq!(window.current_page, 3);
        assert_eq!(window.last_page, 3);
    }

    #[test]
    fn test_zero_page_is_treated_as_first() {
        let request = PageRequest::new(0, 10);
        assert_eq!(request.page(), 1);
    }

    #[test]
    fn test_per_page_is_clamped() {
        assert_eq!(PageRequest::new(1, 0).per_page(), 1);
        assert_eq!(PageRequest::new(1, 1_000).per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let window = PageRequest::default().window(0);
        assert_eq!(window.current_page, 1);
        assert_eq!(window.last_page, 1);
        assert!(window.slice::<u8>(&[]).is_empty());
    }
}
