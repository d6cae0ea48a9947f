//! Tesseract OCR
//!
//! `tesseract <image> stdout -l <lang> tsv` を実行し、単語単位のTSVを行単位の断片にまとめる。

use super::OcrEngine;
use crate::error::{LabelScanError, Result};
use label_scan_common::OcrFragment;
use std::path::Path;
use std::process::Command;
use std::time::Instant;
use tracing::debug;

/// TSVの単語行のレベル
const WORD_LEVEL: &str = "5";

pub struct TesseractEngine {
    language: String,
    binary: String,
}

impl TesseractEngine {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            binary: "tesseract".to_string(),
        }
    }

    /// 実行ファイルのパスを変更
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn run_tesseract(&self, image_path: &Path) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .arg("tsv")
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(LabelScanError::Ocr(format!(
                    "tesseract failed (code {:?}): {}",
                    output.status.code(),
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                LabelScanError::OcrUnavailable(self.availability_hint()),
            ),
            Err(e) => Err(LabelScanError::Io(e)),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn availability_hint(&self) -> String {
        format!(
            "{} が見つかりません (apt install tesseract-ocr tesseract-ocr-{})",
            self.binary, self.language
        )
    }

    fn recognize(&self, image_path: &Path) -> Result<Vec<OcrFragment>> {
        let start = Instant::now();
        let tsv = self.run_tesseract(image_path)?;
        let fragments = parse_tsv(&tsv);
        debug!(
            "tesseract: {} fragments in {}ms",
            fragments.len(),
            start.elapsed().as_millis()
        );
        Ok(fragments)
    }
}

/// TesseractのTSV出力を行単位の断片に変換
///
/// 単語行（level 5）を (page, block, par, line) でまとめ、出現順に並べる。
/// 信頼度は0以上の値の平均を 0.0〜1.0 に換算する。
pub fn parse_tsv(tsv: &str) -> Vec<OcrFragment> {
    struct LineAcc {
        key: [String; 4],
        words: Vec<String>,
        conf_sum: f32,
        conf_count: u32,
    }

    let mut lines: Vec<LineAcc> = Vec::new();

    for row in tsv.lines() {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != WORD_LEVEL {
            continue;
        }

        let text = cols[11..].join("\t");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let key = [
            cols[1].to_string(),
            cols[2].to_string(),
            cols[3].to_string(),
            cols[4].to_string(),
        ];
        let conf = cols[10].trim().parse::<f32>().ok().filter(|c| *c >= 0.0);

        let idx = match lines.iter().position(|l| l.key == key) {
            Some(idx) => idx,
            None => {
                lines.push(LineAcc {
                    key,
                    words: Vec::new(),
                    conf_sum: 0.0,
                    conf_count: 0,
                });
                lines.len() - 1
            }
        };
        let acc = &mut lines[idx];

        acc.words.push(text.to_string());
        if let Some(c) = conf {
            acc.conf_sum += c;
            acc.conf_count += 1;
        }
    }

    lines
        .into_iter()
        .map(|l| OcrFragment {
            text: l.words.join(" "),
            confidence: if l.conf_count > 0 {
                Some((l.conf_sum / l.conf_count as f32 / 100.0).clamp(0.0, 1.0))
            } else {
                None
            },
        })
        .collect()
}
