//! 関連記事の検索
//!
//! - Google: Custom Search JSON API（APIキーと検索エンジンIDが必要）
//! - DuckDuckGo: Instant Answer API（認証不要）

mod duckduckgo;
mod google;

pub use duckduckgo::{parse_duckduckgo_response, DuckDuckGoSearch};
pub use google::{parse_google_response, GoogleSearch};

use crate::ai_provider::SearchEngine;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use label_scan_common::SearchHit;

/// クエリ → 検索結果（最大 limit 件）
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// 設定から検索エンジンを生成。None 指定なら検索しない
pub fn build_search_provider(engine: SearchEngine, config: &Config) -> Result<Option<Box<dyn SearchProvider>>> {
    let provider: Box<dyn SearchProvider> = match engine {
        SearchEngine::None => return Ok(None),
        SearchEngine::Google => {
            let (key, cx) = config.get_google_credentials()?;
            Box::new(GoogleSearch::new(key, cx, config.timeout_seconds)?)
        }
        SearchEngine::DuckDuckGo => Box::new(DuckDuckGoSearch::new(config.timeout_seconds)?),
    };
    Ok(Some(provider))
}
