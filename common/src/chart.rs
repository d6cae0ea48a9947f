//! グラフ用データの抽出
//!
//! 数値として解釈できる成分だけを棒グラフの系列にする。

use crate::types::{NutrientField, NutritionRecord};
use serde::{Deserialize, Serialize};

/// 棒グラフの系列。labels と values は同じ長さで、空にはならない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(|l| l.as_str()).zip(self.values.iter().copied())
    }
}

/// レコードから系列を作る。数値の成分が1つもなければ None（データなし）
///
/// - 値の先頭トークンが数値でない成分は除外
/// - Serving Size は量ではないので除外
/// - ラベルは末尾の " (単位)" を取り除いたもの
pub fn chart_series(record: &NutritionRecord) -> Option<ChartSeries> {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    for (key, value) in record.iter() {
        if is_serving_size(key) {
            continue;
        }
        if let Some(magnitude) = value.magnitude {
            labels.push(chart_label(key).to_string());
            values.push(magnitude);
        }
    }

    if labels.is_empty() {
        None
    } else {
        Some(ChartSeries { labels, values })
    }
}

/// "Total Fat (g)" → "Total Fat"
pub fn chart_label(key: &str) -> &str {
    if key.ends_with(')') {
        if let Some(idx) = key.rfind(" (") {
            return key[..idx].trim_end();
        }
    }
    key
}

fn is_serving_size(key: &str) -> bool {
    key == NutrientField::ServingSize.label() || key.eq_ignore_ascii_case("serving size")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_excludes_serving_size() {
        let record: NutritionRecord = vec![("A (g)", "12.5 g"), ("Serving Size", "1 box")]
            .into_iter()
            .collect();

        let series = chart_series(&record).expect("series");
        assert_eq!(series.labels, vec!["A".to_string()]);
        assert_eq!(series.values, vec![12.5]);
    }

    #[test]
    fn test_series_no_data() {
        let record: NutritionRecord = vec![("Total Fat (g)", "12g"), ("Sodium (mg)", "n/a")]
            .into_iter()
            .collect();
        assert!(chart_series(&record).is_none());
        assert!(chart_series(&NutritionRecord::new()).is_none());
    }

    #[test]
    fn test_series_keeps_record_order() {
        let record: NutritionRecord = vec![("Iron", "2.5 mg"), ("Skip", "x"), ("Fiber", "3")]
            .into_iter()
            .collect();
        let series = chart_series(&record).unwrap();
        assert_eq!(series.labels, vec!["Iron", "Fiber"]);
        assert_eq!(series.values, vec![2.5, 3.0]);
        assert_eq!(series.max_value(), 3.0);
    }

    #[test]
    fn test_chart_label() {
        assert_eq!(chart_label("Total Fat (g)"), "Total Fat");
        assert_eq!(chart_label("Iron"), "Iron");
        assert_eq!(chart_label("(x)"), "(x)");
    }
}
