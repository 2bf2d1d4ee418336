//! 實盤導入管線
//!
//! 實盤導出的 CSV 已攜帶帳戶級 pnl_pct，脫敏時跳過滾動餘額一步。
//! 快照重放以配置的預設起始餘額為合成基線，實盤帳戶的真實規模
//! 不進入任何持久化記錄。

use crate::config::ImportConfig;
use crate::data_ingestion::read_live_trades;
use crate::domain_types::{MarketRecord, TradeSource, TradingSessionRecord};
use crate::import::backtest::{to_value, to_values};
use crate::import::report::{ImportEvent, ImportReporter};
use crate::redaction::sanitize_live_trades;
use crate::replay::replay;
use crate::storage::{collections, upsert_chunked, RecordStore};
use anyhow::Result;
use std::path::Path;

/// 執行實盤導入
pub async fn run_live_import(
    folder: &Path,
    config: &ImportConfig,
    store: &dyn RecordStore,
    reporter: &dyn ImportReporter,
) -> Result<()> {
    // ReadRows
    reporter.emit(&ImportEvent::StageStarted { stage: "read_rows" });
    let rows = read_live_trades(&folder.join("trades.csv"))?;

    // Redact（實盤行已是百分比形式）
    reporter.emit(&ImportEvent::StageStarted { stage: "redact" });
    let trades = sanitize_live_trades(&rows, &config.live_session_id)?;
    reporter.emit(&ImportEvent::TradesRedacted {
        count: trades.len(),
        final_balance: config.default_starting_balance,
    });

    // Replay：合成基線重放
    reporter.emit(&ImportEvent::StageStarted { stage: "replay" });
    let outcome = replay(
        &trades,
        config.default_starting_balance,
        &config.market_id,
        "",
        TradeSource::Live,
    )?;
    reporter.emit(&ImportEvent::SnapshotsReplayed {
        count: outcome.snapshots.len(),
        final_balance: outcome.final_balance,
    });

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
        id: config.live_session_id.clone(),
        market_id: config.market_id.clone(),
        started_at: trades.first().map(|t| t.entry_time.clone()),
        ended_at: None,
        mode: "live".to_string(),
        // 實盤起始餘額不公開
        starting_balance: None,
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

    let total_pnl_pct = if config.default_starting_balance != 0.0 {
        (outcome.final_balance - config.default_starting_balance)
            / config.default_starting_balance
            * 100.0
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
