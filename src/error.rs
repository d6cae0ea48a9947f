use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("{0} が設定されていません。`label-scan config {1} YOUR_KEY` で設定してください")]
    MissingApiKey(&'static str, &'static str),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です (png/jpg/jpeg): {0}")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("OCRエラー: {0}")]
    Ocr(String),

    #[error("OCRエンジンが利用できません: {0}")]
    OcrUnavailable(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("検索エラー: {0}")]
    Search(String),

    #[error("グラフ生成エラー: {0}")]
    ChartRender(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] label_scan_common::Error),
}

impl LabelScanError {
    /// 外部サービス（AI・検索）の呼び出しに起因するエラーか
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            LabelScanError::ApiCall(_)
                | LabelScanError::ApiParse(_)
                | LabelScanError::Search(_)
                | LabelScanError::Http(_)
                | LabelScanError::CliExecution(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LabelScanError>;
