//! Integration tests for the web API over the dispatch core.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt; // for .collect().await
use printhub_rs::dispatch::DispatchService;
use printhub_rs::executor::SimulatedExecutor;
use printhub_rs::model::{JobStatus, PrinterStatus};
use printhub_rs::store::RecordStore;
use printhub_rs::web::api::create_router;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

struct TestApp {
    app: Router,
    store: Arc<RecordStore>,
    customer_id: String,
    printer_id: String,
    document_id: String,
}

async fn test_app() -> TestApp {
    let store = Arc::new(RecordStore::new());
    let customer = store
        .create_customer("Alice".to_string(), "alice@hcmut.edu.vn".to_string())
        .await;
    let printer = store
        .create_printer(
            Some("printer-001".to_string()),
            "HP".to_string(),
            "LaserJet Pro M404dn".to_string(),
            PrinterStatus::Enabled,
        )
        .await;
    store
        .create_printer(
            Some("printer-maint".to_string()),
            "Brother".to_string(),
            "HL-L2370DW".to_string(),
            PrinterStatus::Maintenance,
        )
        .await;
    let document = store
        .create_document(&customer.id, "thesis.pdf".to_string(), 12)
        .await
        .unwrap();
    let service = DispatchService::new(
        store.clone(),
        Arc::new(SimulatedExecutor::new(Duration::from_millis(10))),
    );
    TestApp {
        app: create_router(service),
        store,
        customer_id: customer.id,
        printer_id: printer.id,
        document_id: document.id,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_submit_job_returns_pending_job() {
    let t = test_app().await;
    let payload = json!({
        "printer_id": t.printer_id,
        "customer_id": t.customer_id,
        "document_ids": [t.document_id],
    });
    let response = t
        .app
        .clone()
        .oneshot(post_json("/api/v1/jobs", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let job = body_json(response).await;
    assert_eq!(job["status"], "PENDING");
    assert_eq!(job["total_page_cost"], 12);
    assert_eq!(job["documents"].as_array().unwrap().len(), 1);

    // Completion is asynchronous; observe it through the store.
    let job_id = job["id"].as_str().unwrap().to_string();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if t.store.get_job(&job_id).await.unwrap().status == JobStatus::Completed {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("job never completed");
}

#[tokio::test]
async fn test_submit_to_maintenance_printer_rejected() {
    let t = test_app().await;
    let payload = json!({
        "printer_id": "printer-maint",
        "customer_id": t.customer_id,
        "document_ids": [t.document_id],
    });
    let response = t
        .app
        .clone()
        .oneshot(post_json("/api/v1/jobs", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("not enabled"));
}

#[tokio::test]
async fn test_submit_with_unknown_customer_is_404() {
    let t = test_app().await;
    let payload = json!({
        "printer_id": t.printer_id,
        "customer_id": "nobody",
        "document_ids": [t.document_id],
    });
    let response = t
        .app
        .clone()
        .oneshot(post_json("/api/v1/jobs", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_job_not_found() {
    let t = test_app().await;
    let response = t
        .app
        .clone()
        .oneshot(get("/api/v1/jobs/no-such-job"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_jobs_by_customer() {
    let t = test_app().await;
    let payload = json!({
        "printer_id": t.printer_id,
        "customer_id": t.customer_id,
        "document_ids": [t.document_id],
    });
    let response = t
        .app
        .clone()
        .oneshot(post_json("/api/v1/jobs", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = t
        .app
        .clone()
        .oneshot(get(&format!("/api/v1/jobs?customer_id={}", t.customer_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let jobs = body_json(response).await;
    assert_eq!(jobs.as_array().unwrap().len(), 1);

    // Unknown filter target is a 404, matching the point lookups.
    let response = t
        .app
        .clone()
        .oneshot(get("/api/v1/jobs?customer_id=nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_jobs_invalid_time_range() {
    let t = test_app().await;
    let response = t
        .app
        .clone()
        .oneshot(get(
            "/api/v1/jobs?start_time=2026-01-02T00:00:00Z&end_time=2026-01-01T00:00:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_printer_inventory_endpoints() {
    let t = test_app().await;

    let payload = json!({
        "id": "printer-003",
        "brand_name": "Epson",
        "model": "EcoTank ET-4760",
    });
    let response = t
        .app
        .clone()
        .oneshot(post_json("/api/v1/printers", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let printer = body_json(response).await;
    assert_eq!(printer["status"], "ENABLED");
    assert_eq!(printer["busy"], false);

    let response = t
        .app
        .clone()
        .oneshot(get("/api/v1/printers"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let printers = body_json(response).await;
    assert_eq!(printers.as_array().unwrap().len(), 3);

    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/printers/printer-003/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({"status": "DISABLED"}).to_string()))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let printer = body_json(response).await;
    assert_eq!(printer["status"], "DISABLED");
}

#[tokio::test]
async fn test_customer_and_document_endpoints() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/customers",
            json!({"name": "Bob", "email": "bob@hcmut.edu.vn"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let customer = body_json(response).await;
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/documents",
            json!({
                "customer_id": customer_id,
                "file_name": "report.pdf",
                "total_cost_page": 7,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let document = body_json(response).await;
    assert_eq!(document["status"], "PENDING");
    assert_eq!(document["total_cost_page"], 7);

    // Document creation against an unknown customer is rejected.
    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/documents",
            json!({
                "customer_id": "nobody",
                "file_name": "report.pdf",
                "total_cost_page": 7,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
