//! AIレスポンスの整形
//!
//! Gemini / Claude CLI のレスポンス本文から評価テキストを取り出す。

use crate::error::{Error, Result};

/// レスポンスから評価本文を取り出す
///
/// 抽出手順:
/// 1. 全体が ``` ... ``` で囲まれていればフェンスを外す
/// 2. 前後の空白を除去
/// 3. 空ならエラー
///
/// # Examples
/// ```
/// use label_scan_common::clean_response;
///
/// let text = clean_response("```\nLow in sugar.\n```").unwrap();
/// assert_eq!(text, "Low in sugar.");
/// ```
pub fn clean_response(response: &str) -> Result<String> {
    let trimmed = response.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // 開始フェンス行の言語指定（```markdown 等）を捨てる
            let rest = match rest.find('\n') {
                Some(nl) => &rest[nl + 1..],
                None => rest,
            };
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    };

    if body.is_empty() {
        return Err(Error::Parse("AIレスポンスが空です".into()));
    }

    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_plain_text() {
        let text = clean_response("  High in sodium. Contains milk.\n").unwrap();
        assert_eq!(text, "High in sodium. Contains milk.");
    }

    #[test]
    fn test_clean_fenced_with_language() {
        let response = "```markdown\n**Verdict:** moderate\n- sugar is high\n```";
        let text = clean_response(response).unwrap();
        assert_eq!(text, "**Verdict:** moderate\n- sugar is high");
    }

    #[test]
    fn test_clean_keeps_inner_fences() {
        let response = "Summary first\n```\ncode\n```";
        let text = clean_response(response).unwrap();
        assert!(text.starts_with("Summary first"));
        assert!(text.ends_with("```"));
    }

    #[test]
    fn test_clean_empty_response() {
        let result = clean_response("   \n ");
        assert!(matches!(result, Err(Error::Parse(_))));

        assert!(clean_response("```\n```").is_err());
    }
}
