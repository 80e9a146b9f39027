use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `subsidies` 表的一筆資料。
///
/// 只有篩選與排序用到的欄位是具名的，其餘欄位原樣保留在 `extra`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subsidy {
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub apply_end: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `local_news` 表的一筆資料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `academic_circle_events` 表的一筆資料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 詳細畫面顯示的項目，以 `kind` 欄位區分種類
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailItem {
    Subsidy(Subsidy),
    News(NewsArticle),
    Event(AcademicEvent),
}

impl DetailItem {
    pub fn kind(&self) -> &'static str {
        match self {
            DetailItem::Subsidy(_) => "subsidy",
            DetailItem::News(_) => "news",
            DetailItem::Event(_) => "event",
        }
    }

    pub fn title(&self) -> &str {
        let title = match self {
            DetailItem::Subsidy(subsidy) => subsidy.name.as_deref(),
            DetailItem::News(article) => article.name.as_deref(),
            DetailItem::Event(event) => event.title.as_deref(),
        };
        title.unwrap_or("")
    }

    pub fn prefecture(&self) -> Option<&str> {
        match self {
            DetailItem::Subsidy(subsidy) => subsidy.prefecture.as_deref(),
            DetailItem::News(article) => article.prefecture.as_deref(),
            DetailItem::Event(event) => event.prefecture.as_deref(),
        }
    }

    /// 補助金是申請截止日，新聞是發布日，活動是開始日
    pub fn key_date(&self) -> Option<NaiveDate> {
        match self {
            DetailItem::Subsidy(subsidy) => subsidy.apply_end,
            DetailItem::News(article) => article.published_at.map(|at| at.date_naive()),
            DetailItem::Event(event) => event.start_date,
        }
    }
}

/// 使用者選擇的地區
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub prefecture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
}

impl Region {
    pub fn prefecture(prefecture: impl Into<String>) -> Self {
        Self {
            prefecture: prefecture.into(),
            municipality: None,
        }
    }

    pub fn with_municipality(mut self, municipality: impl Into<String>) -> Self {
        self.municipality = Some(municipality.into());
        self
    }
}
