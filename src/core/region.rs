use crate::core::query::SubsidySearchParams;
use crate::domain::model::Region;
use crate::domain::ports::Storage;
use crate::utils::error::{ApiError, Result};

pub const DEFAULT_REGION_KEY: &str = "selected_region.json";

/// 目前選擇的地區。
///
/// 建立時從儲存讀回上次的選擇，每次變更立即寫回。
pub struct RegionContext<S: Storage> {
    storage: S,
    key: String,
    current: Option<Region>,
}

impl<S: Storage> RegionContext<S> {
    pub async fn initialize(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match storage.read_file(&key).await {
            Ok(bytes) if bytes.is_empty() => None,
            Ok(bytes) => match serde_json::from_slice::<Option<Region>>(&bytes) {
                Ok(region) => region,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable region selection in {}: {}", key, e);
                    None
                }
            },
            Err(ApiError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to load region selection from {}: {}", key, e);
                None
            }
        };

        if let Some(region) = &current {
            tracing::debug!("Restored region selection: {:?}", region);
        }

        Self {
            storage,
            key,
            current,
        }
    }

    pub fn current(&self) -> Option<&Region> {
        self.current.as_ref()
    }

    pub async fn select(&mut self, region: Region) -> Result<()> {
        self.current = Some(region);
        self.persist().await
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.current = None;
        self.persist().await
    }

    /// 只填入請求中尚未指定的地區欄位
    pub fn apply_to(&self, params: &mut SubsidySearchParams) {
        let Some(region) = &self.current else {
            return;
        };

        if is_blank(params.prefecture.as_deref()) {
            params.prefecture = Some(region.prefecture.clone());
        }
        if is_blank(params.municipality.as_deref()) {
            if let Some(municipality) = &region.municipality {
                params.municipality = Some(municipality.clone());
            }
        }
    }

    async fn persist(&self) -> Result<()> {
        let data = serde_json::to_vec(&self.current)?;
        self.storage.write_file(&self.key, &data).await
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or("").is_empty()
}
