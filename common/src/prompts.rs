//! 外部サービスに渡す文字列の生成
//!
//! - build_health_prompt: AI健康評価用プロンプト
//! - build_search_queries: 関連記事検索のクエリ

use crate::types::NutritionRecord;

/// 評価で注目させる観点
pub const ASSESSMENT_FOCUS: &[&str] = &[
    "アレルゲン (allergens)",
    "過剰な糖分・塩分・飽和脂肪",
    "添加物や避けたい原材料",
    "1食あたりの栄養バランス",
];

/// 健康評価プロンプト生成
///
/// # Arguments
/// * `text` - OCRで読み取ったラベル全文
/// * `record` - 抽出済みの成分（空ならその旨を伝える）
pub fn build_health_prompt(text: &str, record: &NutritionRecord) -> String {
    let fields = if record.is_empty() {
        "(no structured nutrition fields could be extracted)".to_string()
    } else {
        record
            .iter()
            .map(|(k, v)| format!("- {}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let focus = ASSESSMENT_FOCUS
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a nutrition expert reviewing a photographed food label.
The label text was read by OCR and may contain recognition errors.

## Label text
{text}

## Extracted nutrition fields
{fields}

## Points to cover
{focus}

Give a short, plain-language health assessment of this product in English:
whether it is a healthy choice, which ingredients or nutrients are concerning,
and any allergens a shopper should be warned about. Do not invent values that
are not present on the label."#
    )
}

/// 検索クエリ生成
///
/// 空行を除いたOCR行の先頭 `max` 件をそのままクエリにする。
pub fn build_search_queries<S: AsRef<str>>(lines: &[S], max: usize) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_health_prompt_includes_text_and_fields() {
        let record: NutritionRecord = vec![("Sodium (mg)", "200mg")].into_iter().collect();
        let prompt = build_health_prompt("Sodium 200mg\nContains: peanuts", &record);
        assert!(prompt.contains("Contains: peanuts"));
        assert!(prompt.contains("- Sodium (mg): 200mg"));
        assert!(prompt.contains("アレルゲン"));
    }

    #[test]
    fn test_build_health_prompt_empty_record() {
        let prompt = build_health_prompt("", &NutritionRecord::new());
        assert!(prompt.contains("no structured nutrition fields"));
    }

    #[test]
    fn test_build_search_queries() {
        let lines = vec!["  Sugar ", "", "Palm oil", "Salt", "E621", "Soy", "Milk"];
        let queries = build_search_queries(&lines, 5);
        assert_eq!(queries, vec!["Sugar", "Palm oil", "Salt", "E621", "Soy"]);

        assert!(build_search_queries(&lines, 0).is_empty());
        assert!(build_search_queries::<&str>(&[], 5).is_empty());
    }
}
