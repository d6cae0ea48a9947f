//! 解析結果レポート

use chrono::{DateTime, Local};
use label_scan_common::{ExtractionPolicy, NutritionRecord, OcrFragment, SearchHit};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 各ステップの結果
///
/// 「データなし」「外部呼び出しの失敗」「実行していない」を区別する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome<T> {
    Ok { value: T },
    NoData,
    Failed { error: String },
    Skipped,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Outcome::Ok { value }
    }

    pub fn failed(error: impl ToString) -> Self {
        Outcome::Failed { error: error.to_string() }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// 1クエリ分の検索結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchGroup {
    pub query: String,
    pub hits: Outcome<Vec<SearchHit>>,
}

/// 棒グラフの出力結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOutput {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png_path: Option<PathBuf>,
}

/// 画像1枚の解析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub file_name: String,
    pub scanned_at: DateTime<Local>,
    pub policy: ExtractionPolicy,
    pub fragments: Vec<OcrFragment>,
    pub text: String,
    pub nutrition: NutritionRecord,
    pub assessment: Outcome<String>,
    pub chart: Outcome<ChartOutput>,
    pub related: Vec<SearchGroup>,
}

impl ScanReport {
    /// 失敗した外部呼び出しの数
    pub fn failure_count(&self) -> usize {
        let search_failures = self.related.iter().filter(|g| g.hits.is_failed()).count();
        search_failures
            + usize::from(self.assessment.is_failed())
            + usize::from(self.chart.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let ok: Outcome<String> = Outcome::ok("fine".to_string());
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"status":"ok","value":"fine"}"#
        );

        let no_data: Outcome<String> = Outcome::NoData;
        assert_eq!(serde_json::to_string(&no_data).unwrap(), r#"{"status":"noData"}"#);

        let failed: Outcome<String> = Outcome::failed("timeout");
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"status":"failed","error":"timeout"}"#
        );
    }

    #[test]
    fn test_outcome_roundtrip() {
        let json = r#"{"status":"skipped"}"#;
        let outcome: Outcome<Vec<SearchHit>> = serde_json::from_str(json).unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert!(outcome.value().is_none());
    }
}
