//! 解析パイプライン
//!
//! 画像1枚ごとに OCR → 成分抽出 → AI評価 → グラフ → 関連記事検索 を順に実行する。
//! 画像の読み込みとOCRの失敗はその画像だけを中断し、それ以降のステップの失敗はレポートに記録する。

use crate::assessor::HealthAssessor;
use crate::chart;
use crate::error::{LabelScanError, Result};
use crate::ocr::OcrEngine;
use crate::report::{ChartOutput, Outcome, ScanReport, SearchGroup};
use crate::scanner::{self, ImageInfo};
use crate::search::SearchProvider;
use chrono::Local;
use label_scan_common::{
    build_health_prompt, build_search_queries, chart_series, join_fragments, ExtractionPolicy,
    NutritionRecord, OcrFragment,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub policy: ExtractionPolicy,
    pub max_queries: usize,
    pub results_per_query: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            policy: ExtractionPolicy::Keyword,
            max_queries: 5,
            results_per_query: 5,
        }
    }
}

/// 複数画像の解析結果
#[derive(Debug, Default)]
pub struct BatchResult {
    pub reports: Vec<ScanReport>,
    /// (ファイル名, エラー)
    pub failed: Vec<(String, LabelScanError)>,
}

impl BatchResult {
    pub fn all_failed(&self) -> bool {
        self.reports.is_empty() && !self.failed.is_empty()
    }
}

pub struct Pipeline {
    ocr: Box<dyn OcrEngine>,
    assessor: Option<Box<dyn HealthAssessor>>,
    search: Option<Box<dyn SearchProvider>>,
    options: ScanOptions,
}

impl Pipeline {
    pub fn new(ocr: Box<dyn OcrEngine>, options: ScanOptions) -> Self {
        Self {
            ocr,
            assessor: None,
            search: None,
            options,
        }
    }

    pub fn with_assessor(mut self, assessor: Option<Box<dyn HealthAssessor>>) -> Self {
        self.assessor = assessor;
        self
    }

    pub fn with_search(mut self, search: Option<Box<dyn SearchProvider>>) -> Self {
        self.search = search;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// 画像を順に解析
    ///
    /// 1枚の失敗は記録して次へ進む。`chart` は画像が1枚ならファイル、複数ならディレクトリ。
    pub async fn scan_all(&self, images: &[ImageInfo], chart: Option<&Path>) -> BatchResult {
        let multiple = images.len() > 1;
        let mut batch = BatchResult::default();

        for (idx, image) in images.iter().enumerate() {
            info!("[{}/{}] {}", idx + 1, images.len(), image.file_name);
            let chart_path = chart.map(|p| chart_path_for(p, &image.path, multiple));

            match self.scan_image(image, chart_path.as_deref()).await {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    warn!("{} の解析を中断: {}", image.file_name, e);
                    batch.failed.push((image.file_name.clone(), e));
                }
            }
        }

        batch
    }

    /// 画像1枚を解析
    ///
    /// `chart_path` を指定すると棒グラフをPNGで保存する。
    pub async fn scan_image(&self, image: &ImageInfo, chart_path: Option<&Path>) -> Result<ScanReport> {
        let staged = scanner::stage_image(image)?;
        info!(
            "{}: {}x{} を {} で読み取り",
            image.file_name,
            staged.width,
            staged.height,
            self.ocr.name()
        );

        // 同期呼び出し。画像は1枚ずつ処理する
        let fragments = self.ocr.recognize(staged.path())?;
        // 一時ファイルはここで削除
        drop(staged);

        Ok(self.scan_fragments(&image.file_name, fragments, chart_path).await)
    }

    /// OCR済みの断片から残りのステップを実行
    pub async fn scan_fragments(
        &self,
        file_name: &str,
        fragments: Vec<OcrFragment>,
        chart_path: Option<&Path>,
    ) -> ScanReport {
        let lines: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        let nutrition = self.options.policy.extract(&lines);
        let text = join_fragments(&fragments);
        info!("{}: {}行から{}項目を抽出", file_name, lines.len(), nutrition.len());

        let assessment = self.assess(&text, &nutrition).await;
        let chart = render_chart(&nutrition, chart_path);
        let related = self.search_related(&lines).await;

        ScanReport {
            file_name: file_name.to_string(),
            scanned_at: Local::now(),
            policy: self.options.policy,
            fragments,
            text,
            nutrition,
            assessment,
            chart,
            related,
        }
    }

    async fn assess(&self, text: &str, nutrition: &NutritionRecord) -> Outcome<String> {
        let Some(assessor) = &self.assessor else {
            return Outcome::Skipped;
        };

        if text.trim().is_empty() {
            return Outcome::NoData;
        }

        let prompt = build_health_prompt(text, nutrition);
        match assessor.assess(&prompt).await {
            Ok(answer) => Outcome::ok(answer),
            Err(e) => {
                warn!("{} による評価に失敗: {}", assessor.name(), e);
                Outcome::failed(e)
            }
        }
    }

    async fn search_related(&self, lines: &[&str]) -> Vec<SearchGroup> {
        let Some(search) = &self.search else {
            return Vec::new();
        };

        let queries = build_search_queries(lines, self.options.max_queries);
        let mut groups = Vec::with_capacity(queries.len());

        for query in queries {
            let hits = match search.search(&query, self.options.results_per_query).await {
                Ok(hits) if hits.is_empty() => Outcome::NoData,
                Ok(hits) => Outcome::ok(hits),
                Err(e) => {
                    warn!("{} 検索に失敗 ({}): {}", search.name(), query, e);
                    Outcome::failed(e)
                }
            };
            groups.push(SearchGroup { query, hits });
        }

        groups
    }
}

/// 複数画像のときは <出力先>/<画像名>.chart.png
pub fn chart_path_for(chart: &Path, image: &Path, multiple: bool) -> PathBuf {
    if !multiple {
        return chart.to_path_buf();
    }
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "label".to_string());
    chart.join(format!("{}.chart.png", stem))
}

/// 数値の成分が無ければ NoData。PNG保存の失敗は Failed
fn render_chart(nutrition: &NutritionRecord, chart_path: Option<&Path>) -> Outcome<ChartOutput> {
    let Some(series) = chart_series(nutrition) else {
        return Outcome::NoData;
    };

    if let Some(path) = chart_path {
        if let Err(e) = chart::render_png(&series, path) {
            warn!("グラフ保存に失敗: {}", e);
            return Outcome::failed(e);
        }
    }

    Outcome::ok(ChartOutput {
        labels: series.labels,
        values: series.values,
        png_path: chart_path.map(Path::to_path_buf),
    })
}
