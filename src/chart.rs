//! 棒グラフの描画
//!
//! - render_png: 横棒グラフをPNGで保存（文字は描かない。並びは系列順）
//! - render_text: ターミナル表示用の横棒グラフ

use crate::error::{LabelScanError, Result};
use image::{Rgb, RgbImage};
use label_scan_common::ChartSeries;
use std::path::Path;

const CHART_WIDTH: u32 = 800;
const ROW_HEIGHT: u32 = 40;
const BAR_HEIGHT: u32 = 24;
const PADDING: u32 = 20;
const TEXT_BAR_WIDTH: usize = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([160, 160, 160]);
const PALETTE: &[Rgb<u8>] = &[
    Rgb([66, 133, 244]),
    Rgb([219, 68, 55]),
    Rgb([244, 180, 0]),
    Rgb([15, 157, 88]),
    Rgb([171, 71, 188]),
    Rgb([0, 172, 193]),
];

/// 値 / 最大値 の比率（最大値が0以下なら0）
fn bar_ratio(value: f64, max: f64) -> f64 {
    if max <= 0.0 || value <= 0.0 {
        0.0
    } else {
        (value / max).min(1.0)
    }
}

/// 横棒グラフ画像を生成
pub fn render_image(series: &ChartSeries) -> RgbImage {
    let rows = series.len() as u32;
    let height = rows * ROW_HEIGHT + PADDING * 2;
    let mut img = RgbImage::from_pixel(CHART_WIDTH, height, BACKGROUND);

    let max = series.max_value();
    let span = CHART_WIDTH - PADDING * 2;

    for (i, (_, value)) in series.iter().enumerate() {
        let top = PADDING + i as u32 * ROW_HEIGHT + (ROW_HEIGHT - BAR_HEIGHT) / 2;
        let length = (bar_ratio(value, max) * span as f64).round() as u32;
        let color = PALETTE[i % PALETTE.len()];

        for y in top..top + BAR_HEIGHT {
            for x in PADDING..PADDING + length {
                img.put_pixel(x, y, color);
            }
        }
    }

    // 縦軸
    for y in PADDING / 2..height - PADDING / 2 {
        img.put_pixel(PADDING - 1, y, AXIS);
    }

    img
}

/// PNGで保存
pub fn render_png(series: &ChartSeries, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    render_image(series)
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| LabelScanError::ChartRender(format!("{}: {}", path.display(), e)))
}

/// ターミナル用の横棒グラフ
pub fn render_text(series: &ChartSeries) -> String {
    let max = series.max_value();
    let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    series
        .iter()
        .map(|(label, value)| {
            let filled = (bar_ratio(value, max) * TEXT_BAR_WIDTH as f64).round() as usize;
            format!(
                "{:<width$} │{} {}",
                label,
                "█".repeat(filled),
                value,
                width = label_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> ChartSeries {
        ChartSeries {
            labels: vec!["Total Fat".into(), "Sodium".into()],
            values: vec![10.0, 200.0],
        }
    }

    #[test]
    fn test_render_image_dimensions_and_bars() {
        let img = render_image(&series());
        assert_eq!(img.width(), CHART_WIDTH);
        assert_eq!(img.height(), 2 * ROW_HEIGHT + PADDING * 2);

        // 最大値の棒は右端近くまで伸びる
        let y = PADDING + ROW_HEIGHT + ROW_HEIGHT / 2;
        assert_eq!(*img.get_pixel(CHART_WIDTH - PADDING - 1, y), PALETTE[1]);
        // 小さい値の棒は短い
        let y = PADDING + ROW_HEIGHT / 2;
        assert_eq!(*img.get_pixel(CHART_WIDTH / 2, y), BACKGROUND);
        assert_eq!(*img.get_pixel(PADDING + 1, y), PALETTE[0]);
    }

    #[test]
    fn test_render_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("chart.png");
        render_png(&series(), &path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), CHART_WIDTH);
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&series());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Total Fat │██ 10"));
        assert!(lines[1].starts_with("Sodium    │"));
        assert!(lines[1].ends_with(&format!("{} 200", "█".repeat(TEXT_BAR_WIDTH))));
    }

    #[test]
    fn test_bar_ratio_zero_max() {
        assert_eq!(bar_ratio(0.0, 0.0), 0.0);
        assert_eq!(bar_ratio(-1.0, 5.0), 0.0);
        assert_eq!(bar_ratio(5.0, 5.0), 1.0);
    }
}
