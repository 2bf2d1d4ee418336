use anyhow::Result;
use serde_json::Value;

/// 持久化集合名稱
pub mod collections {
    pub const MARKETS: &str = "markets";
    pub const TRADING_SESSIONS: &str = "trading_sessions";
    pub const TRADES: &str = "trades";
    pub const DAILY_SNAPSHOTS: &str = "daily_snapshots";
    pub const OPTIMIZATION_RUNS: &str = "optimization_runs";
}

/// 記錄存取接口
///
/// 實現方按集合名與記錄主鍵 id 做插入或替換。導入管線只依賴
/// 這一接口，測試可注入內存實現。
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// 按 id upsert 一組記錄到指定集合
    async fn upsert(&self, collection: &str, records: &[Value]) -> Result<()>;
}

/// 分批 upsert
///
/// 把記錄切成不超過 batch_size 的批次順序寫入，避免超過存儲的
/// 單請求負載限制。批次之間不回滾：失敗時已提交的批次保留
/// （at-least-once，冪等 upsert 下重跑即可修復）。
pub async fn upsert_chunked(
    store: &dyn RecordStore,
    collection: &str,
    records: &[Value],
    batch_size: usize,
) -> Result<usize> {
    let mut written = 0;
    for batch in records.chunks(batch_size.max(1)) {
        store.upsert(collection, batch).await?;
        written += batch.len();
    }
    Ok(written)
}
