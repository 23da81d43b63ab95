//! HTTP routes.
//!
//! | route | purpose |
//! |---|---|
//! | `GET /` | form page, controls taken from the query string |
//! | `POST /predict` | score the submitted form and render the result page |
//! | `POST /api/predict` | JSON scoring |
//! | `GET /api/fields` | field bounds and defaults |
//! | `GET /api/model` | loaded model description |
//! | `GET /health` | liveness |

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use hf_model::{collect, FieldSpec, FormState, PatientRecord, Scorer, FIELDS};
use hf_present::{present, render_page, Outcome, PageView, Verdict};

use crate::error::AppError;

/// Shared, read-only state: the scorer loaded at startup.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn Scorer>,
    pub title: Arc<str>,
}

impl AppState {
    pub fn new(scorer: Arc<dyn Scorer>, title: impl Into<Arc<str>>) -> Self {
        Self {
            scorer,
            title: title.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub record: PatientRecord,
    pub label: u8,
    pub verdict: Verdict,
    pub probabilities: [f64; 2],
    pub percentages: [String; 2],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub kind: String,
    pub n_features: usize,
}

/// Build the application router. Every request is traced; with no tracing
/// subscriber installed the events reach the `log` backend, completed
/// requests at info level.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    let trace =
        TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_api))
        .route("/api/fields", get(fields))
        .route("/api/model", get(model_info))
        .route("/health", get(health))
        .layer(cors)
        .layer(trace)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn index(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let form = FormState::from_pairs(pairs);
    let record = collect(&form);
    Html(render_page(&PageView {
        title: &state.title,
        state: &form,
        record: &record,
        outcome: None,
    }))
}

async fn predict_form(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> (StatusCode, Html<String>) {
    let form = FormState::from_pairs(pairs);
    let record = collect(&form);
    let (status, outcome) = match state.scorer.score(&record) {
        Ok(result) => {
            let presentation = present(&record, &result);
            log::info!(
                "prediction: {} (p_failure={:.4})",
                presentation.verdict,
                result.probabilities[1]
            );
            (StatusCode::OK, Outcome::Prediction(presentation))
        }
        Err(e) => {
            log::error!("scoring failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Outcome::Failure(e.to_string()))
        }
    };
    let page = render_page(&PageView {
        title: &state.title,
        state: &form,
        record: &record,
        outcome: Some(outcome),
    });
    (status, Html(page))
}

async fn predict_api(
    State(state): State<AppState>,
    Json(values): Json<Map<String, JsonValue>>,
) -> Result<Json<PredictResponse>, AppError> {
    let mut form = FormState::new();
    form.apply_json(&values);
    let record = collect(&form);
    let result = state.scorer.score(&record)?;
    let presentation = present(&record, &result);
    log::info!("api prediction: {}", presentation.verdict);
    Ok(Json(PredictResponse {
        record,
        label: result.label,
        verdict: presentation.verdict,
        probabilities: presentation.probabilities,
        percentages: presentation.percentages,
    }))
}

async fn fields() -> Json<&'static [FieldSpec]> {
    Json(&FIELDS[..])
}

async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(ModelInfo {
        name: state.scorer.name().to_string(),
        kind: state.scorer.kind().to_string(),
        n_features: state.scorer.n_features(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use hf_model::{ScoreError, FIELD_COUNT};
    use tower::ServiceExt;

    struct Stub {
        label: u8,
        proba: [f64; 2],
        width: usize,
    }

    impl Scorer for Stub {
        fn name(&self) -> &str {
            "stub"
        }
        fn kind(&self) -> &str {
            "stub"
        }
        fn n_features(&self) -> usize {
            self.width
        }
        fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], ScoreError> {
            Ok(self.proba)
        }
        fn predict(&self, _features: &[f64]) -> Result<u8, ScoreError> {
            Ok(self.label)
        }
    }

    fn app(label: u8, proba: [f64; 2], width: usize) -> Router {
        let scorer = Arc::new(Stub {
            label,
            proba,
            width,
        });
        router(AppState::new(scorer, "Heart Failure Risk Predictor"))
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = app(0, [1.0, 0.0], FIELD_COUNT)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "ok");
    }

    #[tokio::test]
    async fn test_index_reflects_query_and_clamps() {
        let resp = app(0, [1.0, 0.0], FIELD_COUNT)
            .oneshot(
                Request::builder()
                    .uri("/?age=150&time=7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("<td data-field=\"age\">100</td>"));
        assert!(html.contains("<td data-field=\"time\">7</td>"));
        assert!(!html.contains("data-verdict"));
    }

    #[tokio::test]
    async fn test_predict_form_renders_verdict_and_charts() {
        let resp = app(1, [0.1, 0.9], FIELD_COUNT)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("age=70&ejection_fraction=20"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("High Risk of Heart Failure"));
        assert!(html.contains("data-values=\"0.1000 0.9000\""));
        assert!(html.contains("Heart Failure (90.00%)"));
        assert!(html.contains("<td data-field=\"ejection_fraction\">20</td>"));
    }

    #[tokio::test]
    async fn test_predict_form_surfaces_shape_mismatch() {
        let resp = app(0, [0.5, 0.5], 11)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_string(resp).await;
        assert!(html.contains("Prediction failed: shape mismatch"));
        assert!(!html.contains("data-verdict"));
    }

    #[tokio::test]
    async fn test_predict_api() {
        let body = serde_json::json!({ "age": 10, "platelets": 300000.5, "smoking": true });
        let resp = app(0, [0.82, 0.18], FIELD_COUNT)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let out: PredictResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(out.label, 0);
        assert_eq!(out.verdict, Verdict::Low);
        assert_eq!(out.record.age, 20);
        assert_eq!(out.record.platelets, 300000.5);
        assert_eq!(out.record.smoking, 1);
        assert_eq!(out.percentages, ["82.00%".to_string(), "18.00%".to_string()]);
    }

    #[tokio::test]
    async fn test_predict_api_error_is_json() {
        let resp = app(0, [0.9, 0.9], FIELD_COUNT)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/predict")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 500);
        assert!(body["error"].as_str().unwrap().contains("invalid probability pair"));
    }

    #[tokio::test]
    async fn test_fields_and_model_info() {
        let resp = app(0, [1.0, 0.0], FIELD_COUNT)
            .oneshot(Request::builder().uri("/api/fields").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let fields: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fields.len(), FIELD_COUNT);
        assert_eq!(fields[0]["name"], "age");
        assert_eq!(fields[6]["kind"], "float");

        let resp = app(0, [1.0, 0.0], FIELD_COUNT)
            .oneshot(Request::builder().uri("/api/model").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let info: ModelInfo = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info.kind, "stub");
        assert_eq!(info.n_features, FIELD_COUNT);
    }
}
