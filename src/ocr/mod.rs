//! OCRエンジン
//!
//! 起動時に1度だけ生成し、Pipeline に渡して使い回す。

mod tesseract;

pub use tesseract::{parse_tsv, TesseractEngine};

use crate::error::Result;
use label_scan_common::OcrFragment;
use std::path::Path;

/// 画像 → テキスト断片（エンジンの出力順）
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// 依存バイナリ等が揃っているか
    fn is_available(&self) -> bool;

    /// 利用できない場合の案内
    fn availability_hint(&self) -> String;

    fn recognize(&self, image_path: &Path) -> Result<Vec<OcrFragment>>;
}
