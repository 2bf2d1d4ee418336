use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use serde::{Deserialize, Serialize};

/// 應用程序配置結構
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub store: StoreConfig,
    pub import: ImportConfig,
    pub log: LogConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.store.validate()?;
        self.import.validate()?;
        self.log.validate()?;

        Ok(())
    }
}

/// 持久化存儲配置（PostgREST 端點）
///
/// url 與 service_key 為必要配置項，缺失時在加載階段直接失敗，
/// 不會帶著不完整憑證進入導入管線。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub service_key: String,
    pub request_timeout_secs: u64,
}

impl Validator for StoreConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.url, "store.url")?;
        ValidationUtils::not_empty(&self.service_key, "store.service_key")?;
        ValidationUtils::in_range(self.request_timeout_secs, 1, 300, "store.request_timeout_secs")?;

        Ok(())
    }
}

impl StoreConfig {
    /// 獲取請求超時持續時間
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// 導入管線配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 目標市場記錄 ID
    pub market_id: String,
    /// 市場顯示代碼
    pub market_symbol: String,
    /// K線週期
    pub market_interval: String,
    /// 摘要未提供起始餘額時的預設值，同時作為實時重放的基準餘額
    pub default_starting_balance: f64,
    /// 批次上載的記錄數上限（存儲負載限制）
    pub batch_size: usize,
    /// 實時導入使用的交易時段 ID
    pub live_session_id: String,
}

impl Validator for ImportConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.market_id, "import.market_id")?;
        ValidationUtils::not_empty(&self.market_symbol, "import.market_symbol")?;
        ValidationUtils::not_empty(&self.market_interval, "import.market_interval")?;
        ValidationUtils::not_empty(&self.live_session_id, "import.live_session_id")?;
        ValidationUtils::positive(self.default_starting_balance, "import.default_starting_balance")?;
        ValidationUtils::in_range(self.batch_size, 1, 50, "import.batch_size")?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.format",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ApplicationConfig {
        ApplicationConfig {
            store: StoreConfig {
                url: "http://127.0.0.1:54321".to_string(),
                service_key: "local-dev-key".to_string(),
                request_timeout_secs: 30,
            },
            import: ImportConfig {
                market_id: "mkt_btc_001".to_string(),
                market_symbol: "BTC-USD".to_string(),
                market_interval: "15m".to_string(),
                default_starting_balance: 10000.0,
                batch_size: 50,
                live_session_id: "sess_btc_live_001".to_string(),
            },
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_missing_service_key_rejected() {
        let mut cfg = sample_config();
        cfg.store.service_key = "".to_string();
        let err = cfg.validate().unwrap_err();
        match err {
            ValidationError::MissingField(field) => assert_eq!(field, "store.service_key"),
            other => panic!("預期 MissingField，實際為 {:?}", other),
        }
    }

    #[test]
    fn test_batch_size_limit() {
        let mut cfg = sample_config();
        cfg.import.batch_size = 51;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut cfg = sample_config();
        cfg.log.level = "verbose".to_string();
        assert!(cfg.validate().is_err());
    }
}
