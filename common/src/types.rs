//! 栄養成分ラベルの型定義
//!
//! CLIとテストで共有される型:
//! - NutrientField: キーワード方式で認識する固定の成分
//! - NutrientValue: 値文字列と、先頭トークンを数値化した結果
//! - NutritionRecord: 成分名 → 値 の挿入順マップ
//! - OcrFragment / SearchHit: 外部サービスからの入力

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// キーワード方式で認識する成分（優先順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientField {
    Energy,
    TotalFat,
    SaturatedFat,
    Protein,
    Carbohydrate,
    Sodium,
    ServingSize,
}

impl NutrientField {
    /// 行の照合順。先に一致したものが優先される
    pub const PRIORITY: [NutrientField; 7] = [
        NutrientField::Energy,
        NutrientField::TotalFat,
        NutrientField::SaturatedFat,
        NutrientField::Protein,
        NutrientField::Carbohydrate,
        NutrientField::Sodium,
        NutrientField::ServingSize,
    ];

    /// 行に含まれていればこの成分とみなす部分文字列（大文字小文字を区別）
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            NutrientField::Energy => &["Energy", "Calories"],
            NutrientField::TotalFat => &["Total Fat"],
            NutrientField::SaturatedFat => &["Saturated Fat"],
            NutrientField::Protein => &["Protein"],
            NutrientField::Carbohydrate => &["Carbohydrate"],
            NutrientField::Sodium => &["Sodium"],
            NutrientField::ServingSize => &["Serving size"],
        }
    }

    /// レコードのキーとして使う表示名
    pub fn label(&self) -> &'static str {
        match self {
            NutrientField::Energy => "Energy (kcal)",
            NutrientField::TotalFat => "Total Fat (g)",
            NutrientField::SaturatedFat => "Saturated Fat (g)",
            NutrientField::Protein => "Protein (g)",
            NutrientField::Carbohydrate => "Carbohydrate (g)",
            NutrientField::Sodium => "Sodium (mg)",
            NutrientField::ServingSize => "Serving Size",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|f| f.label() == label)
    }

    /// 行に最初に一致した成分
    pub fn match_line(line: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|f| f.keywords().iter().any(|k| line.contains(k)))
    }
}

impl fmt::Display for NutrientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 成分の値
///
/// `raw` はOCRから得た文字列そのまま。`magnitude` は先頭の空白区切りトークンを
/// 浮動小数として解釈できた場合のみ入る（"12g" のように単位が連結した値は None）。
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientValue {
    pub raw: String,
    pub magnitude: Option<f64>,
    pub unit: Option<String>,
}

impl NutrientValue {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut tokens = raw.split_whitespace();
        let magnitude = tokens
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .filter(|v| v.is_finite());

        let unit = if magnitude.is_some() {
            let rest = tokens.collect::<Vec<_>>().join(" ");
            if rest.is_empty() { None } else { Some(rest) }
        } else {
            None
        };

        Self { raw, magnitude, unit }
    }

    pub fn is_numeric(&self) -> bool {
        self.magnitude.is_some()
    }
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 1枚のラベルから抽出した成分マップ
///
/// キーは一意。同じキーへの再挿入は値のみ上書きし、位置は最初の挿入位置のまま。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutritionRecord {
    entries: Vec<(String, NutrientValue)>,
}

impl NutritionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: NutrientValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&NutrientValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 値文字列を取得
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.get(key).map(|v| v.raw.as_str())
    }

    pub fn field(&self, field: NutrientField) -> Option<&NutrientValue> {
        self.get(field.label())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NutrientValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NutritionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = NutritionRecord::new();
        for (k, v) in iter {
            record.insert(k, NutrientValue::parse(v));
        }
        record
    }
}

impl Serialize for NutritionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &value.raw)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NutritionRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = NutritionRecord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of nutrient names to value strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = NutritionRecord::new();
                while let Some((key, raw)) = access.next_entry::<String, String>()? {
                    record.insert(key, NutrientValue::parse(raw));
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// OCRエンジンが返す1断片（おおむね1行）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrFragment {
    pub text: String,

    /// 0.0〜1.0。エンジンが返さない場合は None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl OcrFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), confidence: None }
    }
}

/// 断片を改行で連結した表示用テキスト
pub fn join_fragments(fragments: &[OcrFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 関連記事の検索結果1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}
