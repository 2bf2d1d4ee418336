//! Supabase PostgREST 存取實現
//!
//! 對 `{url}/rest/v1/{collection}` 發 POST，帶
//! `Prefer: resolution=merge-duplicates` 與 `on_conflict=id`，
//! 即按主鍵 id 的冪等 upsert。服務憑證同時作為 apikey 與 Bearer token。

use crate::config::StoreConfig;
use crate::storage::store::RecordStore;
use anyhow::{anyhow, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
}

impl SupabaseStore {
    /// 從存儲配置構建客戶端
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.service_key);
        let mut auth_header =
            HeaderValue::from_str(&auth_value).context("服務憑證包含無效字符")?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);
        let mut apikey_header =
            HeaderValue::from_str(&config.service_key).context("服務憑證包含無效字符")?;
        apikey_header.set_sensitive(true);
        headers.insert("apikey", apikey_header);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=minimal"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .context("無法構建 HTTP 客戶端")?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for SupabaseStore {
    async fn upsert(&self, collection: &str, records: &[Value]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let url = format!("{}/rest/v1/{}?on_conflict=id", self.base_url, collection);
        debug!(collection, count = records.len(), "upsert 批次");

        let response = self
            .client
            .post(&url)
            .json(records)
            .send()
            .await
            .with_context(|| format!("對集合 {} 的 upsert 請求失敗", collection))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "集合 {} 的 upsert 被拒絕: {} {}",
                collection,
                status,
                body
            ));
        }

        Ok(())
    }
}
