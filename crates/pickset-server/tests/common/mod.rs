// crates/pickset-server/tests/common/mod.rs
// =============================================================================
// Module: Server Test Helpers
// Description: Spawn a Pickset server on an ephemeral loopback port.
// Purpose: Share server lifecycle plumbing across HTTP integration suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::PathBuf;

use pickset_config::PicksetConfig;
use pickset_server::PicksetServer;
use pickset_server::ServerError;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Running test server.
pub struct TestServer {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// HTTP client.
    pub client: reqwest::Client,
    /// Audit log written by the server.
    pub audit_path: PathBuf,
    /// Keeps the audit directory alive.
    _dir: tempfile::TempDir,
    /// Signals graceful shutdown.
    shutdown: Option<oneshot::Sender<()>>,
    /// Server task.
    join: Option<JoinHandle<Result<(), ServerError>>>,
}

impl TestServer {
    /// Builds an absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a GET and returns status and JSON body.
    pub async fn get(&self, path: &str) -> Result<(u16, Value), String> {
        let response =
            self.client.get(self.url(path)).send().await.map_err(|err| err.to_string())?;
        read(response).await
    }

    /// Sends a JSON POST and returns status and JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<(u16, Value), String> {
        let request = self.client.post(self.url(path)).json(body);
        let response = request.send().await.map_err(|err| err.to_string())?;
        read(response).await
    }

    /// Sends a JSON PUT and returns status and JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<(u16, Value), String> {
        let request = self.client.put(self.url(path)).json(body);
        let response = request.send().await.map_err(|err| err.to_string())?;
        read(response).await
    }

    /// Sends a DELETE and returns status and JSON body.
    pub async fn delete(&self, path: &str) -> Result<(u16, Value), String> {
        let response =
            self.client.delete(self.url(path)).send().await.map_err(|err| err.to_string())?;
        read(response).await
    }

    /// Returns the audit log lines parsed as JSON.
    pub fn audit_events(&self) -> Result<Vec<Value>, String> {
        let contents = std::fs::read_to_string(&self.audit_path).map_err(|err| err.to_string())?;
        contents
            .lines()
            .map(|line| serde_json::from_str(line).map_err(|err| err.to_string()))
            .collect()
    }

    /// Stops the server and waits for it to exit.
    pub async fn stop(mut self) -> Result<(), String> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        match self.join.take() {
            Some(join) => {
                join.await.map_err(|err| err.to_string())?.map_err(|err| err.to_string())
            }
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Returns a config with a small universe and a file audit log in `dir`.
pub fn test_config(dir: &tempfile::TempDir, max_id: u64) -> PicksetConfig {
    let mut config = PicksetConfig::default();
    config.universe.max_id = max_id;
    config.server.bind = "127.0.0.1:0".to_string();
    config.server.max_body_bytes = 1024;
    config.server.audit.enabled = true;
    config.server.audit.path = Some(dir.path().join("audit.jsonl").to_string_lossy().into_owned());
    config
}

/// Spawns a server with `configure` applied to the default test config.
pub async fn spawn_server(
    max_id: u64,
    configure: impl FnOnce(&mut PicksetConfig),
) -> Result<TestServer, String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let mut config = test_config(&dir, max_id);
    configure(&mut config);
    let audit_path = dir.path().join("audit.jsonl");
    let server = PicksetServer::from_config(config).map_err(|err| err.to_string())?;
    let listener = TcpListener::bind("127.0.0.1:0").await.map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(server.serve_with_shutdown(listener, async move {
        let _ = shutdown_rx.await;
    }));
    Ok(TestServer {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
        audit_path,
        _dir: dir,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    })
}

/// Extracts status and JSON body from a response.
async fn read(response: reqwest::Response) -> Result<(u16, Value), String> {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.map_err(|err| err.to_string())?;
    Ok((status, body))
}
