//! Health endpoint integration test.
//!
//! Run with: `cargo test -p pdfpix-api --test health_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_health_reports_status_and_version() {
    let app = setup_test_app().await;

    let response = app.server.get(&app.api_path("/health")).await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "0.1.0");
}
