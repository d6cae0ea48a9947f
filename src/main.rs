use clap::Parser;
use label_scan::ai_provider::AiProvider;
use label_scan::{assessor, chart, cli, config, error, ocr, pipeline, report, scanner, search};
use cli::{Cli, Commands};
use config::Config;
use error::{LabelScanError, Result};
use label_scan_common::{chart_series, ExtractionPolicy, NutritionRecord};
use ocr::{OcrEngine, TesseractEngine};
use pipeline::{Pipeline, ScanOptions};
use report::{Outcome, ScanReport};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { path, policy, ai, search, max_queries, results, chart, output, lang } => {
            println!("🥫 label-scan - 栄養成分ラベル解析\n");

            // 1. 画像スキャン
            let images = scanner::collect_images(&path)?;
            if images.is_empty() {
                return Err(LabelScanError::NoImagesFound(path.display().to_string()));
            }
            println!("✔ {}枚の画像を検出", images.len());

            // 2. 外部サービスの準備
            let language = lang.unwrap_or_else(|| config.ocr_language.clone());
            let engine = TesseractEngine::new(&language);
            if !engine.is_available() {
                return Err(LabelScanError::OcrUnavailable(engine.availability_hint()));
            }

            let options = ScanOptions {
                policy,
                max_queries: max_queries.unwrap_or(config.max_queries),
                results_per_query: results.unwrap_or(config.results_per_query),
            };
            let health_assessor = assessor::build_assessor(ai, &config)?;
            let ai_name = match &health_assessor {
                Some(_) => ai.display_name().to_string(),
                None if ai != AiProvider::None => format!("{}（APIキー未設定のため省略）", ai.display_name()),
                None => ai.display_name().to_string(),
            };
            let pipeline = Pipeline::new(Box::new(engine), options)
                .with_assessor(health_assessor)
                .with_search(search::build_search_provider(search, &config)?);
            println!(
                "  抽出方式: {} / AI: {} / 検索: {}\n",
                policy,
                ai_name,
                search.display_name()
            );

            // 3. 解析
            let batch = pipeline.scan_all(&images, chart.as_deref()).await;
            for report in &batch.reports {
                println!("[{}]", report.file_name);
                print_report(report);
            }
            for (file_name, e) in &batch.failed {
                println!("✖ {}: {}", file_name, e);
            }
            if batch.all_failed() {
                if let Some((_, e)) = batch.failed.into_iter().next() {
                    return Err(e);
                }
            }
            let reports = batch.reports;

            // 4. 結果保存
            if let Some(output) = output {
                let json = if images.len() > 1 {
                    serde_json::to_string_pretty(&reports)?
                } else {
                    serde_json::to_string_pretty(&reports[0])?
                };
                std::fs::write(&output, json)?;
                println!("✔ 結果を保存: {}", output.display());
            }

            let failures: usize = reports.iter().map(ScanReport::failure_count).sum();
            let skipped = images.len() - reports.len();
            if failures > 0 || skipped > 0 {
                println!(
                    "\n⚠ 完了（外部呼び出しの失敗: {}件 / 解析できなかった画像: {}枚）",
                    failures, skipped
                );
            } else {
                println!("\n✅ 解析完了");
            }
        }

        Commands::Extract { input, policy } => {
            let text = read_input(&input)?;
            let record = policy.extract_text(&text);
            print_extract(&record, policy)?;
        }

        Commands::Config { set_gemini_key, set_google_key, set_google_cx, show } => {
            let mut config = config;
            let changed = set_gemini_key.is_some() || set_google_key.is_some() || set_google_cx.is_some();

            if let Some(key) = set_gemini_key {
                config.gemini_api_key = Some(key);
                println!("✔ Gemini APIキーを設定しました");
            }
            if let Some(key) = set_google_key {
                config.google_api_key = Some(key);
                println!("✔ Google APIキーを設定しました");
            }
            if let Some(cx) = set_google_cx {
                config.google_cx = Some(cx);
                println!("✔ 検索エンジンIDを設定しました");
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定 ({}):", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  OCR言語: {}", config.ocr_language);
                println!("  検索クエリ数: {}", config.max_queries);
                println!("  1クエリの結果数: {}", config.results_per_query);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  Gemini APIキー: {}", status(config.get_gemini_key().is_ok()));
                println!("  Google検索: {}", status(config.get_google_credentials().is_ok()));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "label_scan=debug,label_scan_common=debug"
    } else {
        "label_scan=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn status(ok: bool) -> &'static str {
    if ok { "設定済み" } else { "未設定" }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    if !input.exists() {
        return Err(LabelScanError::FileNotFound(input.display().to_string()));
    }
    Ok(std::fs::read_to_string(input)?)
}

fn print_extract(record: &NutritionRecord, policy: ExtractionPolicy) -> Result<()> {
    if record.is_empty() {
        eprintln!("成分が見つかりませんでした (policy: {})", policy);
    }
    println!("{}", serde_json::to_string_pretty(record)?);
    if let Some(series) = chart_series(record) {
        eprintln!("\n{}", chart::render_text(&series));
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!("--- 読み取りテキスト ---");
    if report.text.is_empty() {
        println!("(テキストなし)");
    } else {
        println!("{}", report.text);
    }

    println!("--- 成分 ---");
    if report.nutrition.is_empty() {
        println!("(データなし)");
    } else {
        for (key, value) in report.nutrition.iter() {
            println!("  {}: {}", key, value);
        }
    }

    match &report.assessment {
        Outcome::Ok { value } => println!("--- AI評価 ---\n{}", value),
        Outcome::NoData => println!("--- AI評価 ---\n(評価対象のテキストなし)"),
        Outcome::Failed { error } => println!("--- AI評価 ---\n✖ {}", error),
        Outcome::Skipped => {}
    }

    println!("--- グラフ ---");
    match &report.chart {
        Outcome::Ok { value } => {
            let series = label_scan_common::ChartSeries {
                labels: value.labels.clone(),
                values: value.values.clone(),
            };
            println!("{}", chart::render_text(&series));
            if let Some(path) = &value.png_path {
                println!("✔ グラフを保存: {}", path.display());
            }
        }
        Outcome::NoData => println!("(数値データなし)"),
        Outcome::Failed { error } => println!("✖ {}", error),
        Outcome::Skipped => {}
    }

    if !report.related.is_empty() {
        println!("--- 関連記事 ---");
        for group in &report.related {
            println!("[{}]", group.query);
            match &group.hits {
                Outcome::Ok { value } => {
                    for hit in value {
                        println!("  - {}: {}", hit.title, hit.url);
                    }
                }
                Outcome::NoData => println!("  (該当なし)"),
                Outcome::Failed { error } => println!("  ✖ {}", error),
                Outcome::Skipped => {}
            }
        }
    }
    println!();
}
