use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;

use gateway::config::{AppConfig, CorsConfig, ServerConfig, StorageConfig};
use gateway::state::AppState;
use gateway::storage::FileStore;

pub mod routes {
    pub const HEALTH: &str = "/api/health";
    pub const UPLOAD: &str = "/api/upload";
}

pub const ALLOWED_ORIGIN: &str = "http://localhost:5500";

/// A running test gateway with its own temp storage directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub upload_dir: PathBuf,
    _storage_root: tempfile::TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_limit(50 * 1024 * 1024).await
    }

    pub async fn spawn_with_limit(max_upload_size: u64) -> Self {
        let storage_root = tempfile::tempdir().expect("Failed to create temp storage dir");
        let upload_dir = storage_root.path().join("uploads");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![ALLOWED_ORIGIN.to_string()],
                    max_age: 3600,
                },
            },
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                max_upload_size,
            },
        };

        let store = FileStore::open(&upload_dir)
            .await
            .expect("Failed to open upload store");

        let state = AppState {
            config,
            store: Arc::new(store),
        };
        let app = gateway::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            upload_dir,
            _storage_root: storage_root,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart upload with a `file` part and optional `targetVersion`.
    pub async fn upload(
        &self,
        file_name: &str,
        file_bytes: Vec<u8>,
        version: Option<&str>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str("application/java-archive")
            .expect("Failed to set MIME type");
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(v) = version {
            form = form.text("targetVersion", v.to_string());
        }

        let res = self
            .client
            .post(self.url(routes::UPLOAD))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart form carrying two `file` parts.
    pub async fn upload_two_files(&self) -> TestResponse {
        let first = reqwest::multipart::Part::bytes(b"first".to_vec())
            .file_name("first.jar".to_string());
        let second = reqwest::multipart::Part::bytes(b"second".to_vec())
            .file_name("second.jar".to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", first)
            .part("file", second);

        let res = self
            .client
            .post(self.url(routes::UPLOAD))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart form with no `file` field at all.
    pub async fn upload_without_file(&self) -> TestResponse {
        let form = reqwest::multipart::Form::new().text("targetVersion", "1.20");

        let res = self
            .client
            .post(self.url(routes::UPLOAD))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Names of the files currently in the storage directory.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("Failed to read upload dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}
