//! 栄養成分の抽出
//!
//! OCR断片（1行ずつ）から NutritionRecord を作る。2つの方式を持つ:
//! - Keyword: 固定の成分キーワードを部分一致で探し、行末トークンを値とする
//! - Pattern: `<名前>: <数値><単位>` 形式の行をすべて成分とみなす
//!
//! どちらも失敗しない。一致しない行は黙って読み飛ばし、何も見つからなければ空のレコードを返す。

use crate::error::Error;
use crate::types::{NutrientField, NutrientValue, NutritionRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 抽出方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPolicy {
    #[default]
    Keyword,
    Pattern,
}

impl ExtractionPolicy {
    /// 行の並びからレコードを作る。後の行が同じ成分を上書きする
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> NutritionRecord {
        let mut record = NutritionRecord::new();
        for line in lines {
            if let Some((key, value)) = self.extract_line(line.as_ref()) {
                record.insert(key, value);
            }
        }
        record
    }

    /// 1行を解析。成分でなければ None
    pub fn extract_line(&self, line: &str) -> Option<(String, NutrientValue)> {
        match self {
            ExtractionPolicy::Keyword => extract_keyword_line(line)
                .map(|(field, value)| (field.label().to_string(), value)),
            ExtractionPolicy::Pattern => extract_pattern_line(line),
        }
    }

    /// 改行区切りのテキストブロックから抽出
    pub fn extract_text(&self, text: &str) -> NutritionRecord {
        let lines: Vec<&str> = text.lines().collect();
        self.extract(&lines)
    }
}

impl std::str::FromStr for ExtractionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" | "keywords" | "k" => Ok(ExtractionPolicy::Keyword),
            "pattern" | "regex" | "p" => Ok(ExtractionPolicy::Pattern),
            _ => Err(Error::Parse(format!(
                "Unknown policy: {}. Use keyword or pattern",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionPolicy::Keyword => write!(f, "keyword"),
            ExtractionPolicy::Pattern => write!(f, "pattern"),
        }
    }
}

/// キーワード方式で1行を解析
///
/// 最初に一致した成分のみを採用し、行末の空白区切りトークンを値とする。
/// Energy のみ末尾の "kcal" を取り除く。`300 kcal` のように単位が独立した
/// トークンなら直前の数値を値とする。一致した行は値が空でも必ず成分を更新する。
pub fn extract_keyword_line(line: &str) -> Option<(NutrientField, NutrientValue)> {
    let field = NutrientField::match_line(line)?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let last = *tokens.last()?;

    let value = match field {
        NutrientField::Energy => match last.strip_suffix("kcal") {
            Some("") => energy_before_unit(&tokens),
            Some(stripped) => stripped,
            None => last,
        },
        _ => last,
    };

    Some((field, NutrientValue::parse(value)))
}

/// `kcal` 単独トークンの直前が数値ならそれを返す。無ければ空文字
fn energy_before_unit<'a>(tokens: &[&'a str]) -> &'a str {
    match tokens.len().checked_sub(2).map(|i| tokens[i]) {
        Some(prev) if prev.starts_with(|c: char| c.is_ascii_digit()) => prev,
        _ => "",
    }
}

/// パターン方式で1行を解析
///
/// `Iron: 2.5 mg` → ("Iron", "2.5 mg")、`Fiber: 3` → ("Fiber", "3")
pub fn extract_pattern_line(line: &str) -> Option<(String, NutrientValue)> {
    lazy_static::lazy_static! {
        static ref FIELD_RE: Regex =
            Regex::new(r"^\s*([^:]+):\s*(\d+(?:\.\d+)?)\s*([A-Za-zµμ%]+)?").unwrap();
    }

    let caps = FIELD_RE.captures(line)?;
    let label = caps.get(1)?.as_str().trim();
    if label.is_empty() {
        return None;
    }

    let number = caps.get(2)?.as_str();
    let value = match caps.get(3) {
        Some(unit) => format!("{} {}", number, unit.as_str()),
        None => number.to_string(),
    };

    Some((label.to_string(), NutrientValue::parse(value)))
}
