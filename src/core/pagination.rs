use serde::Serialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MIN_LIMIT: u64 = 1;
pub const MAX_LIMIT: u64 = 100;
/// 後端的 OFFSET 是 bigint，超過會變成查詢錯誤
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// 經過正規化的分頁請求，`page >= 1`、`1 <= limit <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

/// 包含兩端的資料列範圍 `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub from: u64,
    pub to: u64,
}

impl RowWindow {
    pub fn offset(&self) -> u64 {
        self.from
    }

    pub fn limit(&self) -> u64 {
        self.to - self.from + 1
    }
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            limit: limit.clamp(MIN_LIMIT, MAX_LIMIT),
        }
    }

    /// 從查詢字串的原始值建立。
    ///
    /// `page` 不是正整數時視為 1；`limit` 無法解析時為 20，之後夾在 [1, 100]。
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(parse_integer)
            .filter(|p| *p >= 1)
            .map(|p| p as u64)
            .unwrap_or(DEFAULT_PAGE);

        let limit = match limit.and_then(parse_integer) {
            Some(l) if l < MIN_LIMIT as i64 => MIN_LIMIT,
            Some(l) => (l as u64).min(MAX_LIMIT),
            None => DEFAULT_LIMIT,
        };

        Self::new(page, limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }

    pub fn window(&self) -> RowWindow {
        let from = self.offset();
        RowWindow {
            from,
            to: from.saturating_add(self.limit - 1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn compute(request: PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(request.limit());
        let current_page = request.page();

        Self {
            current_page,
            total_pages,
            total_count,
            limit: request.limit(),
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}
