// 模組定義
pub mod config;
pub mod data_ingestion;
pub mod distribution;
pub mod domain_types;
pub mod import;
pub mod redaction;
pub mod replay;
pub mod storage;
pub mod utils;
