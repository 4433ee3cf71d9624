//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pdfpix-api --test extract_test`
//! or `cargo test -p pdfpix-api`.

#![allow(dead_code)]

pub mod fixtures;

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use pdfpix_api::setup::routes;
use pdfpix_api::state::AppState;
use pdfpix_core::Config;
use tempfile::TempDir;

/// Test application: server, config, and the owned temp directory.
pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn api_path(&self, path: &str) -> String {
        format!("{}{}", self.config.api_prefix, path)
    }

    /// Turn an absolute image URL from a response into a server-relative path.
    pub fn relative_url(&self, url: &str) -> String {
        url.strip_prefix(self.config.server_url.trim_end_matches('/'))
            .expect("URL should start with the configured server URL")
            .to_string()
    }

    /// Upload directories currently present under the images root.
    pub fn upload_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(entries) = std::fs::read_dir(self.config.images_dir()) {
            for entry in entries.flatten() {
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    dirs.push(entry.path());
                }
            }
        }
        dirs
    }
}

/// Setup a test app backed by an isolated temp directory.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("temp dir");

    let config = Config {
        api_prefix: "/api/v1".to_string(),
        project_name: "PDF Image Extractor".to_string(),
        version: "0.1.0".to_string(),
        server_url: "http://localhost:8000".to_string(),
        server_port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        max_upload_size_bytes: 10 * 1024 * 1024,
        allowed_extensions: vec!["pdf".to_string()],
        allowed_content_types: vec!["application/pdf".to_string()],
        temp_dir: temp_dir.path().to_path_buf(),
        environment: "test".to_string(),
        cleanup_enabled: false,
        image_retention_secs: 86_400,
        cleanup_interval_secs: 300,
    };

    // Mirrors application startup
    std::fs::create_dir_all(config.images_dir()).expect("images dir");

    let state = Arc::new(AppState::new(config.clone()));
    let router = routes::setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        config,
        _temp_dir: temp_dir,
    }
}
