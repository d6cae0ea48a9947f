//! DuckDuckGo Instant Answer

use super::SearchProvider;
use crate::error::{LabelScanError, Result};
use async_trait::async_trait;
use label_scan_common::SearchHit;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DDG_API_URL: &str = "https://api.duckduckgo.com/";

#[derive(Deserialize)]
struct DdgResponse {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

/// 通常の項目か、`Topics` を持つカテゴリのどちらか
#[derive(Deserialize)]
struct DdgTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    #[serde(rename = "Topics", default)]
    topics: Vec<DdgTopic>,
}

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    url: String,
}

impl DuckDuckGoSearch {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            url: DDG_API_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        debug!("DuckDuckGo search: {}", query);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LabelScanError::Search(format!("DuckDuckGo returned {}", status)));
        }

        let body = response.text().await?;
        parse_duckduckgo_response(&body, limit)
    }
}

/// `RelatedTopics[]` を検索結果に変換
///
/// カテゴリ（`Topics` を持つ項目）は中身を展開する。`Text` の無い項目は捨てる。
/// タイトルは " - " より前、スニペットは Text 全体。
pub fn parse_duckduckgo_response(body: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let response: DdgResponse = serde_json::from_str(body)
        .map_err(|e| LabelScanError::Search(format!("DuckDuckGo JSONパースエラー: {}", e)))?;

    let mut hits = Vec::new();
    collect_topics(response.related_topics, &mut hits);
    hits.truncate(limit);
    Ok(hits)
}

fn collect_topics(topics: Vec<DdgTopic>, hits: &mut Vec<SearchHit>) {
    for topic in topics {
        if !topic.topics.is_empty() {
            collect_topics(topic.topics, hits);
            continue;
        }

        let Some(text) = topic.text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };

        let title = text
            .split_once(" - ")
            .map(|(head, _)| head)
            .unwrap_or(text.as_str())
            .trim()
            .to_string();

        hits.push(SearchHit {
            title,
            url: topic.first_url.unwrap_or_default(),
            snippet: text,
        });
    }
}
