use crate::error::{LabelScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GOOGLE_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const GOOGLE_CX_ENV: &str = "GOOGLE_SEARCH_ENGINE_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cx: Option<String>,
    pub model: String,
    pub ocr_language: String,
    pub max_queries: usize,
    pub results_per_query: usize,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            google_api_key: None,
            google_cx: None,
            model: "gemini-2.0-flash".into(),
            ocr_language: "eng".into(),
            max_queries: 5,
            results_per_query: 5,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LabelScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("label-scan").join("config.json"))
    }

    pub fn get_gemini_key(&self) -> Result<String> {
        env_or(GEMINI_KEY_ENV, &self.gemini_api_key)
            .ok_or(LabelScanError::MissingApiKey("Gemini APIキー", "--set-gemini-key"))
    }

    /// Google Custom Search のキーと検索エンジンID
    pub fn get_google_credentials(&self) -> Result<(String, String)> {
        let key = env_or(GOOGLE_KEY_ENV, &self.google_api_key)
            .ok_or(LabelScanError::MissingApiKey("Google APIキー", "--set-google-key"))?;
        let cx = env_or(GOOGLE_CX_ENV, &self.google_cx)
            .ok_or(LabelScanError::MissingApiKey("検索エンジンID", "--set-google-cx"))?;
        Ok((key, cx))
    }
}

/// 環境変数を優先
fn env_or(var: &str, fallback: &Option<String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.clone().filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.max_queries, 5);
        assert_eq!(config.ocr_language, "eng");
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            google_cx: Some("cx-123".into()),
            max_queries: 3,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.google_cx.as_deref(), Some("cx-123"));
        assert_eq!(loaded.max_queries, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model": "gemini-1.5-pro"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.model, "gemini-1.5-pro");
        assert_eq!(loaded.timeout_seconds, 120);
    }

    #[test]
    fn test_env_or_ignores_blank() {
        assert_eq!(
            env_or("LABEL_SCAN_TEST_UNSET_VAR", &Some("  ".into())),
            None
        );
        assert_eq!(
            env_or("LABEL_SCAN_TEST_UNSET_VAR", &Some("k".into())).as_deref(),
            Some("k")
        );
    }
}
