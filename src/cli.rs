use clap::{Parser, Subcommand};
use crate::ai_provider::{AiProvider, SearchEngine};
use label_scan_common::ExtractionPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "label-scan")]
#[command(about = "栄養成分ラベルのOCR・成分抽出・AI健康評価ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ラベル画像（またはフォルダ内の画像）を解析
    Scan {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 抽出方式 (keyword/pattern)
        #[arg(short, long, default_value = "keyword", value_parser = parse_policy)]
        policy: ExtractionPolicy,

        /// 健康評価に使うAI (gemini/claude/none)
        #[arg(long, default_value = "gemini")]
        ai: AiProvider,

        /// 関連記事の検索エンジン (google/duckduckgo/none)
        #[arg(long, default_value = "none")]
        search: SearchEngine,

        /// 検索するOCR行数の上限（省略時は設定値）
        #[arg(long)]
        max_queries: Option<usize>,

        /// 1クエリあたりの検索結果数（省略時は設定値）
        #[arg(long)]
        results: Option<usize>,

        /// 棒グラフPNGの出力先（フォルダ指定時は <画像名>.chart.png）
        #[arg(long)]
        chart: Option<PathBuf>,

        /// 解析結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OCR言語（tesseractの言語コード、省略時は設定値）
        #[arg(long)]
        lang: Option<String>,
    },

    /// OCR済みテキスト（1行1断片）から成分だけを抽出
    Extract {
        /// テキストファイル（`-` で標準入力）
        #[arg(required = true)]
        input: PathBuf,

        /// 抽出方式 (keyword/pattern)
        #[arg(short, long, default_value = "keyword", value_parser = parse_policy)]
        policy: ExtractionPolicy,
    },

    /// 設定を表示/編集
    Config {
        /// Gemini APIキーを設定
        #[arg(long)]
        set_gemini_key: Option<String>,

        /// Google Custom Search APIキーを設定
        #[arg(long)]
        set_google_key: Option<String>,

        /// Google検索エンジンID (cx) を設定
        #[arg(long)]
        set_google_cx: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

fn parse_policy(s: &str) -> Result<ExtractionPolicy, String> {
    s.parse::<ExtractionPolicy>().map_err(|e| e.to_string())
}
