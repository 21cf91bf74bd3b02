use async_trait::async_trait;
use roi_simulator::core::PdfRenderer;
use roi_simulator::{build_router, RoiEngine, RoiError, SqliteScenarioStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Renderer double that returns canned bytes or a canned failure.
struct StubRenderer {
    fail_with: Option<String>,
    time_out: bool,
}

#[async_trait]
impl PdfRenderer for StubRenderer {
    async fn render_html_to_pdf(&self, html: &str) -> roi_simulator::Result<Vec<u8>> {
        if self.time_out {
            return Err(RoiError::RenderTimeout { seconds: 30 });
        }
        match &self.fail_with {
            Some(message) => Err(RoiError::render(message.clone())),
            None => {
                assert!(html.contains("Invoicing ROI Report"));
                Ok(b"%PDF-1.7 stub".to_vec())
            }
        }
    }
}

async fn spawn_app(renderer: StubRenderer) -> String {
    let store = SqliteScenarioStore::in_memory().unwrap();
    store.migrate().unwrap();
    let engine = Arc::new(RoiEngine::new(store, renderer));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(engine)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_default_app() -> String {
    spawn_app(StubRenderer {
        fail_with: None,
        time_out: false,
    })
    .await
}

#[tokio::test]
async fn test_simulate_reference_scenario() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/simulate", base))
        .json(&json!({
            "monthly_invoice_volume": 500,
            "hourly_wage": 20,
            "time_horizon_months": 12,
            "one_time_implementation_cost": 1000
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["monthly_savings"].as_f64(), Some(1333.33));
    assert_eq!(body["cumulative_savings"].as_f64(), Some(16000.0));
    assert_eq!(body["payback_months"].as_f64(), Some(0.8));
    assert_eq!(body["roi_percentage"].as_f64(), Some(1500.0));
}

#[tokio::test]
async fn test_simulate_without_savings_reports_infinite_payback_as_null() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{}/simulate", base))
        .json(&json!({"monthly_invoice_volume": 0, "hourly_wage": 0, "one_time_implementation_cost": 2500}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["monthly_savings"].as_f64(), Some(0.0));
    assert!(body["payback_months"].is_null());
    assert_eq!(body["roi_percentage"].as_f64(), Some(-100.0));
}

#[tokio::test]
async fn test_simulate_rejects_malformed_number() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/simulate", base))
        .json(&json!({"hourly_wage": "twenty dollars"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request.");
    assert!(body["message"].as_str().unwrap().contains("hourly_wage"));
}

#[tokio::test]
async fn test_simulate_rejects_invalid_json() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/simulate", base))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_create_then_list_newest_first() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let mut created_ids = Vec::new();
    for name in ["Conservative", "Aggressive"] {
        let response = client
            .post(format!("{}/scenarios", base))
            .json(&json!({
                "inputs": {
                    "scenario_name": name,
                    "monthly_invoice_volume": 500,
                    "hourly_wage": 20,
                    "error_rate_manual": 0.5,
                    "error_cost": 100,
                    "time_horizon_months": 12,
                    "one_time_implementation_cost": 1000
                },
                "results": {"monthly_savings": 1333.33, "roi_percentage": 1500.0, "payback_months": 0.8}
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        let record: Value = response.json().await.unwrap();
        assert_eq!(record["scenario_name"], name);
        assert_eq!(record["error_cost"].as_f64(), Some(100.0));
        assert_eq!(record["roi_percentage"].as_f64(), Some(1500.0));
        assert!(record["num_ap_staff"].is_null());
        created_ids.push(record["id"].as_i64().unwrap());
    }

    let list: Vec<Value> = client
        .get(format!("{}/scenarios", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let listed_ids: Vec<i64> = list.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(listed_ids, vec![created_ids[1], created_ids[0]]);
    assert_eq!(list[0]["scenario_name"], "Aggressive");
}

#[tokio::test]
async fn test_create_defaults_name_and_computes_missing_results() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/scenarios", base))
        .json(&json!({
            "inputs": {
                "monthly_invoice_volume": 500,
                "hourly_wage": 20,
                "time_horizon_months": 12,
                "one_time_implementation_cost": 1000
            }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.unwrap();
    assert_eq!(record["scenario_name"], "Untitled");
    assert_eq!(record["monthly_savings"].as_f64(), Some(1333.33));
    assert_eq!(record["payback_months"].as_f64(), Some(0.8));
    assert!(record.get("cumulative_savings").is_none());
}

#[tokio::test]
async fn test_failed_save_returns_500_and_writes_nothing() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/scenarios", base))
        .json(&json!({"inputs": {"scenario_name": "n".repeat(150)}, "results": {}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to save to database.");
    assert!(!body["message"].as_str().unwrap().is_empty());

    let list: Vec<Value> = client
        .get(format!("{}/scenarios", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_get_scenario_by_id() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/scenarios", base))
        .json(&json!({"inputs": {"scenario_name": "Lookup", "hourly_wage": "25"}, "results": null}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();

    let response = client
        .get(format!("{}/scenarios/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched["hourly_wage"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn test_get_unknown_scenario_is_not_found() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    for path in ["/scenarios/9999", "/scenarios/not-a-number"] {
        let response = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(response.status(), 404, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Not found.");
    }
}

#[tokio::test]
async fn test_generate_report_returns_pdf_attachment() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/report/generate", base))
        .json(&json!({
            "email": "ops@example.com",
            "inputs": {"scenario_name": "Report me", "monthly_invoice_volume": 500},
            "results": {"monthly_savings": 1333.33}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"invoicing_roi_report.pdf\""
    );
    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.7 stub");
}

#[tokio::test]
async fn test_generate_report_surfaces_renderer_failure() {
    let base = spawn_app(StubRenderer {
        fail_with: Some("browser crashed".to_string()),
        time_out: false,
    })
    .await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/report/generate", base))
        .json(&json!({"email": "ops@example.com"}))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_server_error());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to generate report.");
    assert!(body["message"].as_str().unwrap().contains("browser crashed"));
}

#[tokio::test]
async fn test_generate_report_renderer_timeout_is_gateway_timeout() {
    let base = spawn_app(StubRenderer {
        fail_with: None,
        time_out: true,
    })
    .await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/report/generate", base))
        .json(&json!({"email": "ops@example.com", "inputs": {}, "results": {}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 504);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to generate report.");
    assert!(body["message"].as_str().unwrap().contains("30"));
}

#[tokio::test]
async fn test_static_page_health_and_fallback() {
    let base = spawn_default_app().await;
    let client = reqwest::Client::new();

    let index = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(index.status(), 200);
    assert!(index.text().await.unwrap().contains("Invoicing ROI Simulator"));

    let script = client.get(format!("{}/static/app.js", base)).send().await.unwrap();
    assert_eq!(script.status(), 200);

    let health: Value = client
        .get(format!("{}/healthz", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let missing = client.get(format!("{}/nope", base)).send().await.unwrap();
    assert_eq!(missing.status(), 404);
}
