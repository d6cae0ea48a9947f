use clap::ValueEnum;

/// 健康評価に使うAI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AiProvider {
    Gemini,
    Claude,
    None,
}

impl AiProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::Claude => "claude",
            AiProvider::None => "none",
        }
    }
}

/// 関連記事の検索エンジン
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SearchEngine {
    Google,
    #[value(name = "duckduckgo", alias = "ddg")]
    DuckDuckGo,
    None,
}

impl SearchEngine {
    pub fn display_name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::DuckDuckGo => "duckduckgo",
            SearchEngine::None => "none",
        }
    }
}
