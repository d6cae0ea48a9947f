//! AIによる健康評価
//!
//! - Gemini: generateContent API（HTTP）
//! - Claude: `claude -p` CLI
//!
//! どちらも1回だけ呼び出し、再試行はしない。

mod claude_cli;
mod gemini;

pub use claude_cli::ClaudeCliAssessor;
pub use gemini::{parse_gemini_response, GeminiAssessor};

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{LabelScanError, Result};
use async_trait::async_trait;
use tracing::warn;

/// プロンプト → 評価テキスト
#[async_trait]
pub trait HealthAssessor: Send + Sync {
    fn name(&self) -> &str;

    async fn assess(&self, prompt: &str) -> Result<String>;
}

/// 設定からAIを生成。None 指定なら評価しない
///
/// Gemini のキーが無い場合は警告を出して評価を省略する（スキャン自体は続ける）。
pub fn build_assessor(provider: AiProvider, config: &Config) -> Result<Option<Box<dyn HealthAssessor>>> {
    let assessor: Box<dyn HealthAssessor> = match provider {
        AiProvider::None => return Ok(None),
        AiProvider::Gemini => {
            let api_key = match config.get_gemini_key() {
                Ok(key) => key,
                Err(e @ LabelScanError::MissingApiKey(..)) => {
                    warn!("AI評価を省略: {}", e);
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            Box::new(GeminiAssessor::new(api_key, &config.model, config.timeout_seconds)?)
        }
        AiProvider::Claude => Box::new(ClaudeCliAssessor::new()),
    };
    Ok(Some(assessor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_none() {
        assert!(build_assessor(AiProvider::None, &Config::default()).unwrap().is_none());
    }

    #[test]
    fn test_build_claude() {
        let assessor = build_assessor(AiProvider::Claude, &Config::default()).unwrap().unwrap();
        assert_eq!(assessor.name(), "claude");
    }

    #[test]
    fn test_build_gemini_without_key_is_skipped() {
        if std::env::var("GEMINI_API_KEY").map(|k| !k.trim().is_empty()).unwrap_or(false) {
            eprintln!("GEMINI_API_KEY set; skipping");
            return;
        }
        let assessor = build_assessor(AiProvider::Gemini, &Config::default()).unwrap();
        assert!(assessor.is_none());
    }

    #[test]
    fn test_build_gemini_with_key() {
        let config = Config { gemini_api_key: Some("test-key".into()), ..Default::default() };
        let assessor = build_assessor(AiProvider::Gemini, &config).unwrap().unwrap();
        assert_eq!(assessor.name(), "gemini");
    }
}
