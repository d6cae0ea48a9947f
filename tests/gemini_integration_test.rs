use label_scan::assessor::{GeminiAssessor, HealthAssessor};
use label_scan_common::{build_health_prompt, ExtractionPolicy};

#[tokio::test]
async fn gemini_assessment_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let text = "Nutrition Facts\nServing size 1 bar\nCalories 210\nTotal Fat 9g\nSodium 150mg\nContains: peanuts, milk";
    let record = ExtractionPolicy::Keyword.extract_text(text);
    assert_eq!(record.get_raw("Energy (kcal)"), Some("210"));

    let prompt = build_health_prompt(text, &record);
    let assessor = GeminiAssessor::new(api_key, "gemini-2.0-flash", 60).expect("client build failed");

    let answer = assessor.assess(&prompt).await.expect("gemini call failed");
    assert!(!answer.trim().is_empty());
}
