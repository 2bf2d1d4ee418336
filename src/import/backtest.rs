//! 回測導入管線
//!
//! 讀取結果目錄中的 summary.json 與 trades.csv，脫敏後重放每日快照，
//! 再把市場、時段、交易與快照依次 upsert 到存儲。脫敏與重放完全在
//! 內存中完成後才發送第一個批次，不存在部分行寫入。

use crate::config::ImportConfig;
use crate::data_ingestion::{load_backtest_summary, read_backtest_trades};
use crate::domain_types::{MarketRecord, TradeSource, TradingSessionRecord};
use crate::import::report::{ImportEvent, ImportReporter};
use crate::redaction::{backtest_session_id, redact_trades};
use crate::replay::{final_balance_matches, replay};
use crate::storage::{collections, upsert_chunked, RecordStore};
use crate::utils::time_utils::normalize_naive_timestamp;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// 回測快照 ID 前綴
const SNAPSHOT_PREFIX: &str = "bt_";

/// 執行回測導入
pub async fn run_backtest_import(
    folder: &Path,
    config: &ImportConfig,
    store: &dyn RecordStore,
    reporter: &dyn ImportReporter,
) -> Result<()> {
    // LoadSummary
    reporter.emit(&ImportEvent::StageStarted {
        stage: "load_summary",
    });
    let summary = load_backtest_summary(folder)?;
    reporter.emit(&ImportEvent::SummaryLoaded {
        symbol: summary.symbol.clone(),
        interval: summary.interval.clone(),
        data_start: summary.backtest_timeframe.data_start.clone(),
        data_end: summary.backtest_timeframe.data_end.clone(),
    });

    // ReadRows（缺失或壞值為致命錯誤）
    reporter.emit(&ImportEvent::StageStarted { stage: "read_rows" });
    let rows = read_backtest_trades(&folder.join("trades.csv"))?;

    // Redact
    reporter.emit(&ImportEvent::StageStarted { stage: "redact" });
    let session_id = backtest_session_id(folder);
    let (trades, redacted_balance) = redact_trades(
        &rows,
        &session_id,
        TradeSource::Backtest,
        summary.starting_balance,
    )?;
    reporter.emit(&ImportEvent::TradesRedacted {
        count: trades.len(),
        final_balance: redacted_balance,
    });

    // Replay
    reporter.emit(&ImportEvent::StageStarted { stage: "replay" });
    let outcome = replay(
        &trades,
        summary.starting_balance,
        &config.market_id,
        SNAPSHOT_PREFIX,
        TradeSource::Backtest,
    )?;
    reporter.emit(&ImportEvent::SnapshotsReplayed {
        count: outcome.snapshots.len(),
        final_balance: outcome.final_balance,
    });

    // 對帳：非致命，冪等 upsert 下重導即可修正
    if let Some(expected) = summary.final_balance {
        if !final_balance_matches(outcome.final_balance, expected) {
            reporter.emit(&ImportEvent::ReconciliationMismatch {
                replayed: outcome.final_balance,
                expected,
            });
        }
    }

    // Upsert：market → session → trades（分批）→ snapshots（分批）
    reporter.emit(&ImportEvent::StageStarted { stage: "upsert" });
    let market = MarketRecord {
        id: config.market_id.clone(),
        symbol: config.market_symbol.clone(),
        interval: config.market_interval.clone(),
        is_active: true,
    };
    store
        .upsert(collections::MARKETS, &[to_value(&market)?])
        .await?;
    reporter.emit(&ImportEvent::BatchUpserted {
        collection: collections::MARKETS,
        count: 1,
    });

    let session = TradingSessionRecord {
        id: session_id,
        market_id: config.market_id.clone(),
        started_at: normalize_naive_timestamp(&summary.backtest_timeframe.data_start),
        ended_at: normalize_naive_timestamp(&summary.backtest_timeframe.data_end),
        mode: "backtest".to_string(),
        starting_balance: Some(summary.starting_balance),
    };
    store
        .upsert(collections::TRADING_SESSIONS, &[to_value(&session)?])
        .await?;
    reporter.emit(&ImportEvent::BatchUpserted {
        collection: collections::TRADING_SESSIONS,
        count: 1,
    });

    let trade_values = to_values(&trades)?;
    let written = upsert_chunked(store, collections::TRADES, &trade_values, config.batch_size).await?;
    reporter.emit(&ImportEvent::BatchUpserted {
        collection: collections::TRADES,
        count: written,
    });

    let snapshot_values = to_values(&outcome.snapshots)?;
    let written = upsert_chunked(
        store,
        collections::DAILY_SNAPSHOTS,
        &snapshot_values,
        config.batch_size,
    )
    .await?;
    reporter.emit(&ImportEvent::BatchUpserted {
        collection: collections::DAILY_SNAPSHOTS,
        count: written,
    });

    // Report
    let total_pnl_pct = if summary.starting_balance != 0.0 {
        (outcome.final_balance - summary.starting_balance) / summary.starting_balance * 100.0
    } else {
        0.0
    };
    reporter.emit(&ImportEvent::Completed {
        trades: trades.len(),
        snapshots: outcome.snapshots.len(),
        final_balance: outcome.final_balance,
        total_pnl_pct,
    });

    Ok(())
}

pub(crate) fn to_value<T: serde::Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).context("記錄序列化失敗")
}

pub(crate) fn to_values<T: serde::Serialize>(records: &[T]) -> Result<Vec<Value>> {
    records.iter().map(to_value).collect()
}
