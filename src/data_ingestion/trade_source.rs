//! 交易 CSV 讀取器
//!
//! 把上游導出的交易 CSV 反序列化為類型化原始行。反序列化只綁定
//! 建模過的列，倉位大小、信號值等敏感列即使存在也不會被讀取。
//! 缺少必要列或出現壞值對交易管線是致命錯誤：部分脫敏比整體失敗更糟。

use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::{LiveTradeRow, RawTradeRow};
use serde::de::DeserializeOwned;
use std::path::Path;

/// 回測交易 CSV 的必要列
const BACKTEST_COLUMNS: [&str; 7] = [
    "entry_time",
    "exit_time",
    "type",
    "entry_price",
    "exit_price",
    "pnl",
    "exit_reason",
];

/// 實盤交易 CSV 的必要列（pnl_pct 已由上游計算）
const LIVE_COLUMNS: [&str; 7] = [
    "entry_time",
    "exit_time",
    "type",
    "entry_price",
    "exit_price",
    "pnl_pct",
    "exit_reason",
];

/// 讀取回測交易 CSV（按入場時間排序的文件順序）
pub fn read_backtest_trades(path: &Path) -> IngestResult<Vec<RawTradeRow>> {
    read_rows(path, &BACKTEST_COLUMNS)
}

/// 讀取實盤交易 CSV
pub fn read_live_trades(path: &Path) -> IngestResult<Vec<LiveTradeRow>> {
    read_rows(path, &LIVE_COLUMNS)
}

fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> IngestResult<Vec<T>> {
    if !path.exists() {
        return Err(IngestError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let file_name = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|err| map_csv_error(&file_name, err))?;

    // 先驗證標題行，缺列直接報 SchemaMismatch 而不是逐行反序列化失敗
    let headers = reader
        .headers()
        .map_err(|err| map_csv_error(&file_name, err))?;
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::SchemaMismatch {
            file: file_name,
            missing,
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        // 標題佔第 1 行，數據從第 2 行起
        let row = result.map_err(|err| IngestError::MalformedValue {
            file: file_name.clone(),
            line: idx as u64 + 2,
            message: err.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

fn map_csv_error(file: &str, err: csv::Error) -> IngestError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::Io {
            file: file.to_string(),
            source,
        },
        other => IngestError::MalformedValue {
            file: file.to_string(),
            line: 0,
            message: format!("{:?}", other),
        },
    }
}
