//! Google Custom Search

use super::SearchProvider;
use crate::error::{LabelScanError, Result};
use async_trait::async_trait;
use label_scan_common::SearchHit;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// APIが1リクエストで返せる最大件数
const MAX_NUM: usize = 10;

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
    error: Option<GoogleError>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

pub struct GoogleSearch {
    client: reqwest::Client,
    api_key: String,
    cx: String,
    url: String,
}

impl GoogleSearch {
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            cx: cx.into(),
            url: GOOGLE_SEARCH_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let num = limit.min(MAX_NUM).to_string();
        debug!("Google search: {} (num={})", query, num);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LabelScanError::Search(format!(
                "Google returned {}: {}",
                status, body
            )));
        }

        parse_google_response(&body, limit)
    }
}

/// `items[]` を検索結果に変換
pub fn parse_google_response(body: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let response: GoogleResponse = serde_json::from_str(body)
        .map_err(|e| LabelScanError::Search(format!("Google JSONパースエラー: {}", e)))?;

    if let Some(error) = response.error {
        return Err(LabelScanError::Search(format!("Google API error: {}", error.message)));
    }

    Ok(response
        .items
        .into_iter()
        .take(limit)
        .map(|item| SearchHit {
            title: item.title,
            url: item.link,
            snippet: item.snippet,
        })
        .collect())
}
