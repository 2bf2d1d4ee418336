use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trade_importer::config;
use trade_importer::import::{
    run_backtest_import, run_live_import, run_optimization_import, TracingReporter,
};
use trade_importer::storage::SupabaseStore;

/// 交易數據導入器：把回測 / 優化 / 實盤結果以脫敏形式發佈到持久化存儲
#[derive(Parser)]
#[command(name = "trade_importer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 導入回測結果（交易 + 權益曲線）
    Backtest {
        /// 回測結果目錄
        folder: PathBuf,
    },
    /// 導入優化掃描摘要（僅頭條指標）
    Optimization {
        /// 優化結果目錄
        folder: PathBuf,
    },
    /// 導入實盤交易記錄
    Live {
        /// 實盤結果目錄
        folder: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 任何失敗（含用法錯誤）都以退出碼 1 結束
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap 的預設 exit 對用法錯誤返回 2
            let _ = err.print();
            std::process::exit(1);
        }
    };

    // 初始化配置（缺失必要配置項在此處直接失敗）
    let app_config = config::init_config()?;

    // 初始化日誌系統
    init_logging(&app_config.log)?;

    // 構建存儲客戶端
    let store = SupabaseStore::new(&app_config.store)?;
    let reporter = TracingReporter;

    let result = match &cli.command {
        Command::Backtest { folder } => {
            let folder = check_folder(folder)?;
            info!(folder = %folder.display(), "開始回測導入");
            run_backtest_import(&folder, &app_config.import, &store, &reporter).await
        }
        Command::Optimization { folder } => {
            let folder = check_folder(folder)?;
            info!(folder = %folder.display(), "開始優化摘要導入");
            run_optimization_import(&folder, &store, &reporter).await
        }
        Command::Live { folder } => {
            let folder = check_folder(folder)?;
            info!(folder = %folder.display(), "開始實盤導入");
            run_live_import(&folder, &app_config.import, &store, &reporter).await
        }
    };

    if let Err(err) = &result {
        error!("導入失敗: {:#}", err);
    }
    result
}

/// 驗證結果目錄存在並規範化路徑
fn check_folder(folder: &Path) -> Result<PathBuf> {
    if !folder.exists() {
        return Err(anyhow!("目錄不存在: {}", folder.display()));
    }
    Ok(folder
        .canonicalize()
        .unwrap_or_else(|_| folder.to_path_buf()))
}

/// 初始化日誌系統
fn init_logging(log_config: &config::LogConfig) -> Result<()> {
    let level = match log_config.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // 默認為INFO
    };

    // RUST_LOG 優先於配置文件中的級別
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    if log_config.format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())
            .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;
    }

    info!("日誌系統初始化完成");
    Ok(())
}
