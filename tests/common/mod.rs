//! Shared fixtures: fake collaborators, state wiring and request helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use lexdraft::{
    config::Config,
    create_router,
    services::{CompletionClient, CompletionError, DocumentKind, ExtractionError, TextExtractor},
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "lexdraft-test-boundary";

pub enum Reply {
    Text(String),
    Fail(String),
    Panic,
}

/// Completion client that records every prompt it receives.
pub struct FakeCompletion {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(CompletionError::Api {
                status: 429,
                message: message.clone(),
            }),
            Reply::Panic => panic!("completion client exploded"),
        }
    }
}

/// Extractor that reads the stored file and fails on files starting with `BROKEN`.
#[derive(Default)]
pub struct FakeExtractor {
    seen: Mutex<Vec<PathBuf>>,
}

impl FakeExtractor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, path: &Path, kind: DocumentKind) -> Result<String, ExtractionError> {
        self.seen.lock().unwrap().push(path.to_path_buf());
        let bytes = tokio::fs::read(path).await.map_err(|e| ExtractionError::Pdf {
            message: format!("stored file unreadable: {}", e),
        })?;
        if bytes.starts_with(b"BROKEN") {
            return Err(ExtractionError::Pdf {
                message: "Invalid PDF structure".to_string(),
            });
        }
        Ok(format!("extracted {} text", kind.extension()))
    }
}

pub fn test_config(upload_dir: &Path, vars: &[(&str, &str)]) -> Config {
    let mut map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    map.insert("UPLOAD_DIR".to_string(), upload_dir.display().to_string());
    map.entry("STATIC_DIR".to_string())
        .or_insert_with(|| upload_dir.join("no-static").display().to_string());
    Config::from_lookup(|name| map.get(name).cloned()).unwrap()
}

pub struct TestApp {
    pub state: AppState,
    pub completion: Arc<FakeCompletion>,
    pub extractor: Arc<FakeExtractor>,
    pub upload_dir: PathBuf,
    _root: TempDir,
}

impl TestApp {
    pub fn new(reply: Reply) -> Self {
        Self::with_env(reply, &[])
    }

    pub fn with_env(reply: Reply, vars: &[(&str, &str)]) -> Self {
        let root = TempDir::new().unwrap();
        let upload_dir = root.path().join("uploads");
        let completion = FakeCompletion::new(reply);
        let extractor = FakeExtractor::new();
        let state = AppState::new(
            test_config(&upload_dir, vars),
            completion.clone(),
            extractor.clone(),
        );
        Self {
            state,
            completion,
            extractor,
            upload_dir,
            _root: root,
        }
    }

    /// Puts a regular file where the upload directory should be, so storage fails.
    pub fn with_blocked_upload_dir(reply: Reply, vars: &[(&str, &str)]) -> Self {
        let app = Self::with_env(reply, vars);
        std::fs::write(&app.upload_dir, b"not a directory").unwrap();
        app
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        create_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        read_json(self.send(request).await).await
    }

    pub async fn upload(&self, parts: &[Part]) -> (StatusCode, Value) {
        let request = Request::post("/upload-training-files")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        read_json(self.send(request).await).await
    }

    /// Number of files left in the upload directory, 0 when it was never created.
    pub fn stored_file_count(&self) -> usize {
        match std::fs::read_dir(&self.upload_dir) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub enum Part {
    File {
        field: &'static str,
        name: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    },
    Text {
        field: &'static str,
        value: &'static str,
    },
}

impl Part {
    pub fn pdf(name: &'static str, data: Vec<u8>) -> Self {
        Part::File {
            field: "files",
            name,
            content_type: "application/pdf",
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                field,
                name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}", field, value)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// A PDF-looking payload of exactly `size` bytes.
pub fn pdf_bytes(size: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(size, b'a');
    data
}
