//! Label Scan Common Library
//!
//! OCRテキストからの成分抽出と、外部サービスに依存しない型・ユーティリティ

pub mod types;
pub mod error;
pub mod extractor;
pub mod chart;
pub mod parser;
pub mod prompts;

pub use types::{
    join_fragments, NutrientField, NutrientValue, NutritionRecord, OcrFragment, SearchHit,
};
pub use error::{Error, Result};
pub use extractor::{extract_keyword_line, extract_pattern_line, ExtractionPolicy};
pub use chart::{chart_label, chart_series, ChartSeries};
pub use parser::clean_response;
pub use prompts::{build_health_prompt, build_search_queries};
