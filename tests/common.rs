use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use trade_importer::config::ImportConfig;
use trade_importer::import::{ImportEvent, ImportReporter};
use trade_importer::storage::RecordStore;

/// 按集合與主鍵保存記錄的內存存儲，同時記錄每次批次大小
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    batches: Mutex<Vec<(String, usize)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// 集合中的全部記錄（按 id 排序）
    pub fn records_in(&self, collection: &str) -> Vec<Value> {
        self.records
            .lock()
            .unwrap()
            .get(collection)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 指定集合的各批次大小
    pub fn batch_sizes(&self, collection: &str) -> Vec<usize> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, n)| *n)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().values().all(|m| m.is_empty())
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn upsert(&self, collection: &str, records: &[Value]) -> Result<()> {
        self.batches
            .lock()
            .unwrap()
            .push((collection.to_string(), records.len()));
        let mut guard = self.records.lock().unwrap();
        let entry = guard.entry(collection.to_string()).or_default();
        for record in records {
            let id = record
                .get("id")
                .and_then(Value::as_str)
                .expect("記錄缺少 id 主鍵")
                .to_string();
            entry.insert(id, record.clone());
        }
        Ok(())
    }
}

/// 記錄事件流的報告器
pub struct RecordingReporter {
    pub events: Mutex<Vec<ImportEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn has_reconciliation_mismatch(&self) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, ImportEvent::ReconciliationMismatch { .. }))
    }

    pub fn distribution_skip_reason(&self) -> Option<String> {
        self.events.lock().unwrap().iter().find_map(|e| match e {
            ImportEvent::DistributionsSkipped { reason } => Some(reason.clone()),
            _ => None,
        })
    }
}

impl ImportReporter for RecordingReporter {
    fn emit(&self, event: &ImportEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// 測試用導入配置
pub fn test_import_config() -> ImportConfig {
    ImportConfig {
        market_id: "mkt_btc_001".to_string(),
        market_symbol: "BTC-USD".to_string(),
        market_interval: "15m".to_string(),
        default_starting_balance: 10000.0,
        batch_size: 50,
        live_session_id: "sess_btc_live_001".to_string(),
    }
}

/// 在結果目錄中寫入摘要與交易 CSV
pub fn write_backtest_fixture(folder: &Path, summary: &str, trades_csv: &str) {
    fs::write(folder.join("summary.json"), summary).unwrap();
    fs::write(folder.join("trades.csv"), trades_csv).unwrap();
}
