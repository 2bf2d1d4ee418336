//! 權益重放模組
//!
//! 消費按出場日期排序的脫敏交易序列，純粹從帳戶級 pnl_pct 重建每日
//! 權益快照。重放走過 [首筆出場日 − 1, 末筆出場日] 的每個日曆日，
//! 而不只是有交易的日子，因此快照序列跨週末與假日也無間隙。
//! 日內交易按原始順序逐筆複利：`balance *= 1 + pnl_pct/100`。
//! 回報在帳戶上是乘法複合的，逐筆相加會引入系統性偏差。
use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::{DailySnapshot, SanitizedTrade, TradeSource};
use crate::utils::rounding::{round_balance, round_pct};
use crate::utils::time_utils::{compact_date, date_of_iso_timestamp};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 重放最終餘額與上游報告值的相對容差（0.01%）
///
/// 上游未給出明確界限；0.01% 能吸收餘額 2 位小數捨入在現實交易數量
/// 下的累積誤差，同時仍能暴露排序或複利計算錯誤。
pub const RECONCILE_EPSILON: f64 = 1e-4;

/// 重放結果
#[derive(Debug)]
pub struct ReplayOutcome {
    pub snapshots: Vec<DailySnapshot>,
    /// 未捨入的最終餘額，用於對帳
    pub final_balance: f64,
}

/// 重放脫敏交易為每日快照序列
///
/// 快照 ID 形如 `snap_{id_prefix}{YYYYMMDD}`。合成的「第零日」快照
/// （首筆出場日的前一天）以起始餘額、零 pnl 落點，為權益曲線提供
/// 圖表基線。無交易時返回空序列。
pub fn replay(
    trades: &[SanitizedTrade],
    starting_balance: f64,
    market_id: &str,
    id_prefix: &str,
    source: TradeSource,
) -> IngestResult<ReplayOutcome> {
    // 按出場日曆日分組，保留日內原始順序
    let mut trades_by_date: BTreeMap<NaiveDate, Vec<&SanitizedTrade>> = BTreeMap::new();
    for (idx, trade) in trades.iter().enumerate() {
        let date = date_of_iso_timestamp(&trade.exit_time).ok_or_else(|| {
            IngestError::MalformedTimestamp {
                row: idx + 1,
                field: "exit_time".to_string(),
                value: trade.exit_time.clone(),
            }
        })?;
        trades_by_date.entry(date).or_default().push(trade);
    }

    let (Some(&start_date), Some(&end_date)) = (
        trades_by_date.keys().next(),
        trades_by_date.keys().next_back(),
    ) else {
        return Ok(ReplayOutcome {
            snapshots: Vec::new(),
            final_balance: starting_balance,
        });
    };

    let mut balance = starting_balance;
    let mut snapshots = Vec::new();

    // 第零日快照：起始餘額基線
    let day_zero = start_date.pred_opt().expect("日曆日期不應下溢");
    snapshots.push(DailySnapshot {
        id: snapshot_id(id_prefix, &day_zero),
        market_id: market_id.to_string(),
        date: day_zero,
        open_balance: round_balance(starting_balance),
        close_balance: round_balance(starting_balance),
        daily_pnl: 0.0,
        daily_pnl_pct: 0.0,
        num_trades: 0,
        source,
    });

    let mut current = start_date;
    while current <= end_date {
        let day_trades: &[&SanitizedTrade] = trades_by_date
            .get(&current)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let open_balance = balance;
        // 日內逐筆複利，順序即文件順序
        for trade in day_trades {
            balance *= 1.0 + trade.pnl_pct / 100.0;
        }
        let daily_pnl = balance - open_balance;
        let daily_pnl_pct = if open_balance != 0.0 {
            daily_pnl / open_balance * 100.0
        } else {
            0.0
        };

        snapshots.push(DailySnapshot {
            id: snapshot_id(id_prefix, &current),
            market_id: market_id.to_string(),
            date: current,
            open_balance: round_balance(open_balance),
            close_balance: round_balance(balance),
            daily_pnl: round_balance(daily_pnl),
            daily_pnl_pct: round_pct(daily_pnl_pct),
            num_trades: day_trades.len(),
            source,
        });

        current = current.succ_opt().expect("日曆日期不應上溢");
    }

    Ok(ReplayOutcome {
        snapshots,
        final_balance: balance,
    })
}

fn snapshot_id(prefix: &str, date: &NaiveDate) -> String {
    format!("snap_{}{}", prefix, compact_date(date))
}

/// 對帳：重放出的最終餘額是否在上游報告值的容差內
pub fn final_balance_matches(replayed: f64, expected: f64) -> bool {
    if expected == 0.0 {
        return replayed.abs() <= f64::EPSILON;
    }
    ((replayed - expected) / expected).abs() <= RECONCILE_EPSILON
}
