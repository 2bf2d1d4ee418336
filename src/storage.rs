//! 存儲模組
//!
//! 定義以記錄主鍵 upsert 的存取接口與 PostgREST 實現。
//! upsert 是按 id 的插入或替換，使同一來源的重複導入冪等。
// 宣告子模組
pub mod store;
pub mod supabase;

// 重新導出常用組件
pub use store::{collections, upsert_chunked, RecordStore};
pub use supabase::SupabaseStore;
