use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use hf_model::{collect, FormState, PatientRecord, Scorer};
use hf_present::{present, Verdict};
use hf_server::{router, AppState};
use tests::{defaults_json, CannedScorer};

fn all_defaults() -> PatientRecord {
    PatientRecord {
        age: 60,
        anaemia: 0,
        creatinine_phosphokinase: 250,
        diabetes: 0,
        ejection_fraction: 38,
        high_blood_pressure: 0,
        platelets: 250_000.0,
        serum_creatinine: 1.1,
        serum_sodium: 137,
        sex: 1,
        smoking: 0,
        time: 120,
    }
}

async fn post_form(scorer: Arc<CannedScorer>, body: &'static str) -> (StatusCode, String) {
    let app = router(AppState::new(scorer, "Heart Failure Risk Predictor"));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn defaults_scored_low_risk() {
    let record = collect(&FormState::new());
    assert_eq!(record, all_defaults());

    let scorer = CannedScorer::new(0, [0.82, 0.18]);
    let result = scorer.score(&record).unwrap();
    let presentation = present(&record, &result);

    assert_eq!(presentation.verdict, Verdict::Low);
    assert!(presentation.verdict_banner().contains("Low Risk"));
    assert!(presentation.bar_chart.contains("82.00%"));
    assert!(presentation.bar_chart.contains("18.00%"));
    assert!(presentation
        .donut_chart
        .contains("data-values=\"0.8200 0.1800\""));
    assert!(presentation
        .donut_chart
        .contains("No Heart Failure (82.00%)"));
    assert!(presentation.donut_chart.contains("Heart Failure (18.00%)"));
}

#[test]
fn defaults_scored_high_risk() {
    let record = collect(&FormState::new());
    let scorer = CannedScorer::new(1, [0.10, 0.90]);
    let result = scorer.score(&record).unwrap();
    let presentation = present(&record, &result);

    assert_eq!(presentation.verdict, Verdict::High);
    assert!(presentation.verdict_banner().contains("High Risk"));
    assert_eq!(
        presentation.percentages,
        ["10.00%".to_string(), "90.00%".to_string()]
    );
    assert!(presentation.bar_chart.contains("10.00%"));
    assert!(presentation.bar_chart.contains("90.00%"));
    assert!(presentation
        .donut_chart
        .contains("data-values=\"0.1000 0.9000\""));
}

#[test]
fn probabilities_from_scorer_sum_to_one() {
    let scorer = CannedScorer::new(0, [0.3, 0.7000000001]);
    let result = scorer.score(&all_defaults()).unwrap();
    let [p0, p1] = result.probabilities;
    assert!(p0 >= 0.0 && p1 >= 0.0);
    assert!((p0 + p1 - 1.0).abs() < 1e-12);
}

#[tokio::test]
async fn form_submission_renders_low_risk_page() {
    let scorer = Arc::new(CannedScorer::new(0, [0.82, 0.18]));
    let (status, html) = post_form(scorer, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Low Risk of Heart Failure"));
    assert!(!html.contains("High Risk"));
    assert!(html.contains("data-values=\"0.8200 0.1800\""));
    assert!(html.contains("Heart Failure (18.00%)"));
}

#[tokio::test]
async fn form_submission_renders_high_risk_page() {
    let scorer = Arc::new(CannedScorer::new(1, [0.10, 0.90]));
    let (status, html) = post_form(scorer, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("High Risk of Heart Failure"));
    assert!(!html.contains("Low Risk"));
    assert!(html.contains("data-values=\"0.1000 0.9000\""));
    assert!(html.contains("Heart Failure (90.00%)"));
}

#[tokio::test]
async fn scorer_always_receives_fixed_field_order() {
    let scorer = Arc::new(CannedScorer::new(0, [0.82, 0.18]));
    // fields submitted in reverse order
    let body = "time=200&smoking=1&sex=0&serum_sodium=140&serum_creatinine=2.5&platelets=300000\
                &high_blood_pressure=1&ejection_fraction=25&diabetes=1\
                &creatinine_phosphokinase=582&anaemia=1&age=75";
    let (status, _) = post_form(scorer.clone(), body).await;
    assert_eq!(status, StatusCode::OK);

    let seen = scorer.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        vec![75.0, 1.0, 582.0, 1.0, 25.0, 1.0, 300_000.0, 2.5, 140.0, 0.0, 1.0, 200.0]
    );
}

#[tokio::test]
async fn api_with_defaults_matches_form_result() {
    let scorer = Arc::new(CannedScorer::new(0, [0.82, 0.18]));
    let app = router(AppState::new(scorer.clone(), "Heart Failure Risk Predictor"));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header("content-type", "application/json")
                .body(Body::from(defaults_json().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["verdict"], "low");
    assert_eq!(body["label"], 0);
    assert_eq!(body["percentages"][0], "82.00%");
    assert_eq!(body["record"]["serum_creatinine"], 1.1);
    assert_eq!(scorer.seen()[0], all_defaults().to_features().to_vec());
}
