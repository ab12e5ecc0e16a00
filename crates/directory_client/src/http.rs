//! HTTP implementation of [`DirectoryClient`]

use std::time::Duration;

use async_trait::async_trait;
use org_hierarchy_types::{EmployeePatch, EmployeeRecord, NodeId, RawDepartment};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{DirectoryClient, DirectoryError, Result};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_HIERARCHY_PATH: &str = "departments/hierarchy/";
const DEFAULT_EMPLOYEE_PATH: &str = "employees/";

/// Connection settings for the directory REST API
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_hierarchy_path")]
    pub hierarchy_path: String,
    #[serde(default = "default_employee_path")]
    pub employee_path: String,
    /// Sent as `Authorization: Bearer ...` when present
    #[serde(default)]
    pub bearer_token: Option<String>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_hierarchy_path() -> String {
    DEFAULT_HIERARCHY_PATH.to_string()
}

fn default_employee_path() -> String {
    DEFAULT_EMPLOYEE_PATH.to_string()
}

impl DirectoryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            hierarchy_path: default_hierarchy_path(),
            employee_path: default_employee_path(),
            bearer_token: None,
        }
    }

    /// Read `DIRECTORY_API_URL`, `DIRECTORY_TIMEOUT_MS` and `DIRECTORY_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DIRECTORY_API_URL")
            .map_err(|_| DirectoryError::Config("DIRECTORY_API_URL is not set".to_string()))?;
        let mut config = Self::new(base_url);
        if let Ok(raw) = std::env::var("DIRECTORY_TIMEOUT_MS") {
            config.timeout_ms = raw.parse().map_err(|_| {
                DirectoryError::Config(format!("DIRECTORY_TIMEOUT_MS is not a number: {}", raw))
            })?;
        }
        config.bearer_token = std::env::var("DIRECTORY_API_TOKEN").ok();
        Ok(config)
    }
}

pub struct HttpDirectoryClient {
    client: Client,
    base: Url,
    config: DirectoryConfig,
}

impl HttpDirectoryClient {
    pub fn new(config: DirectoryConfig) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|e| DirectoryError::Config(format!("bad base url '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DirectoryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| DirectoryError::Config(format!("bad path '{}': {}", path, e)))
    }

    fn employee_url(&self, id: &NodeId) -> Result<Url> {
        let mut path = self.config.employee_path.trim_end_matches('/').to_string();
        path.push('/');
        path.push_str(id.as_str());
        path.push('/');
        self.url(&path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(DirectoryError::from_status(status.as_u16(), text));
        }
        serde_json::from_str(&text).map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    async fn read_employee(response: Response, id: &NodeId) -> Result<EmployeeRecord> {
        if response.status() == StatusCode::NOT_FOUND {
            let text = response.text().await?;
            return Err(DirectoryError::not_found(id, &text));
        }
        Self::read_json(response).await
    }
}

/// `GET hierarchy` returns either a list of roots or a single root object
#[derive(Deserialize)]
#[serde(untagged)]
enum HierarchyPayload {
    Many(Vec<RawDepartment>),
    One(Box<RawDepartment>),
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn get_hierarchy(&self) -> Result<Vec<RawDepartment>> {
        let url = self.url(&self.config.hierarchy_path)?;
        tracing::debug!(%url, "fetching hierarchy");

        let response = self.authorize(self.client.get(url)).send().await?;
        let payload: HierarchyPayload = Self::read_json(response).await?;
        Ok(match payload {
            HierarchyPayload::Many(roots) => roots,
            HierarchyPayload::One(root) => vec![*root],
        })
    }

    async fn get_employee(&self, id: &NodeId) -> Result<EmployeeRecord> {
        let url = self.employee_url(id)?;
        tracing::debug!(%url, "fetching employee managers");

        let response = self.authorize(self.client.get(url)).send().await?;
        Self::read_employee(response, id).await
    }

    async fn patch_employee(&self, id: &NodeId, patch: EmployeePatch) -> Result<EmployeeRecord> {
        let url = self.employee_url(id)?;
        tracing::debug!(%url, ?patch, "patching employee");

        let response = self
            .authorize(self.client.patch(url))
            .json(&patch)
            .send()
            .await?;
        Self::read_employee(response, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned response on a local port and return its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });
        format!("http://{}/api/", addr)
    }

    fn local_client(base: String) -> HttpDirectoryClient {
        let mut client = HttpDirectoryClient::new(DirectoryConfig::new(base)).unwrap();
        client.client = Client::builder().no_proxy().build().unwrap();
        client
    }

    #[tokio::test]
    async fn test_not_found_keeps_server_detail() {
        let base = serve_once("404 Not Found", r#"{"detail":"Calisan bulunamadi"}"#).await;
        let client = local_client(base);

        let err = client.get_employee(&NodeId::from("3")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { .. }));
        assert_eq!(err.user_message(), "Calisan bulunamadi");
    }

    #[tokio::test]
    async fn test_server_error_message_reaches_user() {
        let base = serve_once("500 Internal Server Error", r#"{"message":"database offline"}"#).await;
        let client = local_client(base);

        let err = client.get_employee(&NodeId::from("3")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "database offline");
    }

    #[tokio::test]
    async fn test_get_employee_decodes_record() {
        let base = serve_once(
            "200 OK",
            r#"{"id": 3, "primaryManagers": [{"managerId": 1}], "department": 10}"#,
        )
        .await;
        let client = local_client(base);

        let record = client.get_employee(&NodeId::from("3")).await.unwrap();
        assert_eq!(record.primary_managers.len(), 1);
        assert_eq!(record.department, Some(NodeId::from("10")));
    }

    #[test]
    fn test_employee_url_joins_under_base_path() {
        let client = HttpDirectoryClient::new(DirectoryConfig::new("https://hr.example.com/api/v1"))
            .unwrap();
        let url = client.employee_url(&NodeId::from("42")).unwrap();
        assert_eq!(url.as_str(), "https://hr.example.com/api/v1/employees/42/");
    }

    #[test]
    fn test_hierarchy_url_uses_configured_path() {
        let mut config = DirectoryConfig::new("https://hr.example.com/api/");
        config.hierarchy_path = "/org/tree/".to_string();
        let client = HttpDirectoryClient::new(config).unwrap();
        let url = client.url(&client.config.hierarchy_path).unwrap();
        assert_eq!(url.as_str(), "https://hr.example.com/api/org/tree/");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpDirectoryClient::new(DirectoryConfig::new("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, DirectoryError::Config(_)));
    }

    #[test]
    fn test_hierarchy_payload_accepts_single_root() {
        let one: HierarchyPayload = serde_json::from_str(r#"{"id": 1, "name": "HQ"}"#).unwrap();
        assert!(matches!(one, HierarchyPayload::One(_)));
        let many: HierarchyPayload = serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        match many {
            HierarchyPayload::Many(roots) => assert_eq!(roots.len(), 2),
            HierarchyPayload::One(_) => panic!("expected list"),
        }
    }
}
