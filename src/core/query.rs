use crate::core::pagination::{PageRequest, RowWindow};
use crate::domain::model::Subsidy;
use serde::Serialize;
use std::cmp::Ordering;

/// 關鍵字比對的欄位，任一欄位包含即符合
pub const KEYWORD_COLUMNS: [&str; 4] = ["name", "summary", "issuer", "audience"];

/// `get-subsidies` 的查詢字串參數，全部保持原始字串
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsidySearchParams {
    pub prefecture: Option<String>,
    pub municipality: Option<String>,
    pub keyword: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SubsidySearchParams {
    /// 從查詢字串的鍵值對建立；同一個鍵出現多次時取第一個，未知的鍵忽略
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "prefecture" => &mut params.prefecture,
                "municipality" => &mut params.municipality,
                "keyword" => &mut params.keyword,
                "status" => &mut params.status,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// 解析原始查詢字串 (`a=1&b=2`)，解碼不會失敗
    pub fn from_query_string(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }
}

/// 所有條件以 AND 組合；`None` 表示該維度不篩選
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubsidyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SubsidyFilter {
    pub fn from_params(params: &SubsidySearchParams) -> Self {
        Self {
            prefecture: normalize(params.prefecture.as_deref()),
            municipality: normalize(params.municipality.as_deref()),
            keyword: normalize(params.keyword.as_deref()),
            status: normalize(params.status.as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefecture.is_none()
            && self.municipality.is_none()
            && self.keyword.is_none()
            && self.status.is_none()
    }

    pub fn matches(&self, subsidy: &Subsidy) -> bool {
        if let Some(prefecture) = &self.prefecture {
            if subsidy.prefecture.as_deref() != Some(prefecture.as_str()) {
                return false;
            }
        }

        if let Some(status) = &self.status {
            if subsidy.status.as_deref() != Some(status.as_str()) {
                return false;
            }
        }

        if let Some(municipality) = &self.municipality {
            if !contains_ignore_case(subsidy.municipality.as_deref(), municipality) {
                return false;
            }
        }

        if let Some(keyword) = &self.keyword {
            let fields = [
                subsidy.name.as_deref(),
                subsidy.summary.as_deref(),
                subsidy.issuer.as_deref(),
                subsidy.audience.as_deref(),
            ];
            if !fields
                .into_iter()
                .any(|field| contains_ignore_case(field, keyword))
            {
                return false;
            }
        }

        true
    }

    /// PostgREST 篩選參數。列查詢與計數查詢共用同一組
    pub fn to_postgrest_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(prefecture) = &self.prefecture {
            params.push(("prefecture".to_string(), format!("eq.{}", prefecture)));
        }

        if let Some(municipality) = &self.municipality {
            params.push((
                "municipality".to_string(),
                format!("ilike.{}", like_pattern(municipality)),
            ));
        }

        if let Some(status) = &self.status {
            params.push(("status".to_string(), format!("eq.{}", status)));
        }

        if let Some(keyword) = &self.keyword {
            let pattern = quote_logic_value(&like_pattern(keyword));
            let clauses: Vec<String> = KEYWORD_COLUMNS
                .iter()
                .map(|column| format!("{}.ilike.{}", column, pattern))
                .collect();
            params.push(("or".to_string(), format!("({})", clauses.join(","))));
        }

        params
    }
}

/// 空字串或純空白視為未指定
fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// 部分一致的 ILIKE 樣式，使用者輸入中的 `%` `_` `\` 以字面比對
fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('*');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('*');
    escaped
}

/// `or=(...)` 內的值一律加雙引號，避免 `,` `.` `(` `)` 被當成語法
fn quote_logic_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// `apply_end` 升冪，NULL 排在最後
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyEndOrder;

impl ApplyEndOrder {
    pub fn to_postgrest_param(&self) -> (String, String) {
        ("order".to_string(), "apply_end.asc.nullslast".to_string())
    }

    pub fn compare(&self, a: &Subsidy, b: &Subsidy) -> Ordering {
        match (a.apply_end, b.apply_end) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// 列查詢：篩選 + 排序 + 範圍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsidyQuery {
    pub filter: SubsidyFilter,
    pub order: ApplyEndOrder,
    pub window: RowWindow,
}

impl SubsidyQuery {
    pub fn new(filter: SubsidyFilter, page: PageRequest) -> Self {
        Self {
            filter,
            order: ApplyEndOrder,
            window: page.window(),
        }
    }

    pub fn to_postgrest_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.filter.to_postgrest_params());
        params.push(self.order.to_postgrest_param());
        params.push(("offset".to_string(), self.window.offset().to_string()));
        params.push(("limit".to_string(), self.window.limit().to_string()));
        params
    }

    /// 在記憶體中套用同一份查詢計畫
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Subsidy>
    where
        I: IntoIterator<Item = &'a Subsidy>,
    {
        let mut matching: Vec<&Subsidy> = rows
            .into_iter()
            .filter(|subsidy| self.filter.matches(subsidy))
            .collect();
        // 穩定排序，同一截止日保持原順序
        matching.sort_by(|a, b| self.order.compare(a, b));

        let offset = usize::try_from(self.window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.window.limit()).unwrap_or(usize::MAX);

        matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}
