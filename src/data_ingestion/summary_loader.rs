//! 摘要文檔加載器
//!
//! 上游輸出佈局有兩代：新版把 summary.json 放在 summaries/ 子目錄，
//! 舊版直接放在結果目錄根部。候選路徑按序解析一次，全部未命中時
//! 報明確的 SummaryNotFound。

use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::{BacktestSummary, OptimizationSummaryDoc};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// 回測摘要的候選位置（按優先級排序）
const BACKTEST_SUMMARY_CANDIDATES: [&str; 2] = ["summaries/summary.json", "summary.json"];

/// 優化摘要的候選位置
const OPTIMIZATION_SUMMARY_CANDIDATES: [&str; 1] = ["summary.json"];

/// 按序解析候選路徑，返回第一個存在的文件
pub fn resolve_candidates(folder: &Path, candidates: &[&str]) -> IngestResult<PathBuf> {
    for candidate in candidates {
        let path = folder.join(candidate);
        if path.exists() {
            return Ok(path);
        }
    }
    Err(IngestError::SummaryNotFound {
        folder: folder.to_path_buf(),
        candidates: candidates.iter().map(|c| c.to_string()).collect(),
    })
}

/// 加載回測摘要文檔
pub fn load_backtest_summary(folder: &Path) -> IngestResult<BacktestSummary> {
    let path = resolve_candidates(folder, &BACKTEST_SUMMARY_CANDIDATES)?;
    load_json(&path)
}

/// 加載優化掃描摘要文檔
pub fn load_optimization_summary(folder: &Path) -> IngestResult<OptimizationSummaryDoc> {
    let path = resolve_candidates(folder, &OPTIMIZATION_SUMMARY_CANDIDATES)?;
    load_json(&path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> IngestResult<T> {
    let file_name = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| IngestError::Io {
        file: file_name.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| IngestError::Json {
        file: file_name,
        source,
    })
}
