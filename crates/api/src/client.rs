use crate::payload::{
    ActionBody, Flagged, InterfaceStatsBody, PbxStatusPayload, RegistrationsBody, StatsPayload,
    UsageHistoryPayload, WifiScanBody,
};
use dash_core::state::{PbxStatus, Registration, StatsSnapshot, UsageHistory, WifiNetwork};
use dash_core::{DashError, Result, ServiceAction};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the router console's JSON endpoints.
///
/// Cheap to clone: every poll task holds its own copy sharing one
/// connection pool.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    http:     reqwest::Client,
    base_url: String,
}

impl ConsoleClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashError::Http(format!("client setup: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// GET `path` and decode the body. Non-2xx and non-JSON bodies are errors.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DashError::Http(format!("GET {path}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DashError::Http(format!("GET {path}: {e}")))?;

        if !status.is_success() {
            return Err(DashError::Http(format!("GET {path}: status {status}")));
        }

        serde_json::from_str(&body).map_err(|e| DashError::Decode(format!("GET {path}: {e}")))
    }

    pub async fn fetch_stats(&self, path: &str) -> Result<StatsSnapshot> {
        let payload: StatsPayload = self.get_json(path).await?;
        Ok(payload.into_core())
    }

    pub async fn fetch_usage_history(&self, path: &str) -> Result<UsageHistory> {
        let payload: UsageHistoryPayload = self.get_json(path).await?;
        Ok(payload.into_core())
    }

    pub async fn fetch_pbx_status(&self, path: &str) -> Result<PbxStatus> {
        let payload: PbxStatusPayload = self.get_json(path).await?;
        payload.into_core().map_err(DashError::Action)
    }

    pub async fn fetch_registrations(&self, path: &str) -> Result<Vec<Registration>> {
        let payload: Flagged<RegistrationsBody> = self.get_json(path).await?;
        payload
            .into_result()
            .map(|b| b.registrations)
            .map_err(DashError::Action)
    }

    pub async fn scan_wifi(&self) -> Result<Vec<WifiNetwork>> {
        let payload: Flagged<WifiScanBody> = self.get_json("/network/scan_wifi").await?;
        payload
            .into_result()
            .map(|b| b.networks)
            .map_err(DashError::Action)
    }

    pub async fn fetch_interface_stats(&self, id: u32) -> Result<BTreeMap<String, String>> {
        let path = format!("/network/interface/{id}/stats");
        let payload: Flagged<InterfaceStatsBody> = self.get_json(&path).await?;
        payload
            .into_result()
            .map(InterfaceStatsBody::into_core)
            .map_err(DashError::Action)
    }

    /// POST a service action. `Ok` carries the console's message (possibly empty).
    ///
    /// The body is decoded whatever the status code: consoles answer
    /// `{success: false, message}` with error statuses too.
    pub async fn run_action(&self, action: ServiceAction) -> Result<String> {
        let path = action.endpoint();
        let url = self.url(path);
        debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|e| DashError::Http(format!("POST {path}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DashError::Http(format!("POST {path}: {e}")))?;

        let payload: Flagged<ActionBody> = match serde_json::from_str(&body) {
            Ok(p) => p,
            Err(_) if !status.is_success() => {
                return Err(DashError::Http(format!("POST {path}: status {status}")));
            }
            Err(e) => return Err(DashError::Decode(format!("POST {path}: {e}"))),
        };

        let message = payload.message.clone().unwrap_or_default();
        payload.into_result().map(|_| message).map_err(DashError::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    async fn serve(router: Router) -> ConsoleClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ConsoleClient::new(&format!("http://{addr}/"), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn stats_are_decoded() {
        let router = Router::new().route(
            "/dashboard/api/stats",
            get(|| async { Json(json!({"system": {"cpu": {"usage": 33.0}}})) }),
        );
        let client = serve(router).await;
        let stats = client.fetch_stats("/dashboard/api/stats").await.unwrap();
        assert_eq!(stats.system.cpu_usage, Some(33.0));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let router = Router::new().route("/dashboard/api/stats", get(|| async { "<html>login</html>" }));
        let client = serve(router).await;
        let err = client.fetch_stats("/dashboard/api/stats").await.unwrap_err();
        assert!(matches!(err, DashError::Decode(_)));
    }

    #[tokio::test]
    async fn error_status_is_an_http_error() {
        let router = Router::new().route(
            "/freeswitch/registrations",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
        );
        let client = serve(router).await;
        let err = client.fetch_registrations("/freeswitch/registrations").await.unwrap_err();
        assert!(matches!(err, DashError::Http(_)));
    }

    #[tokio::test]
    async fn action_failure_carries_message() {
        let router = Router::new().route(
            "/network/restart",
            post(|| async { Json(json!({"success": false, "message": "X"})) }),
        );
        let client = serve(router).await;
        let err = client.run_action(ServiceAction::RestartNetwork).await.unwrap_err();
        match err {
            DashError::Action(msg) => assert_eq!(msg, "X"),
            other => panic!("wrong error: {other}"),
        }
    }

    #[tokio::test]
    async fn action_success_returns_message() {
        let router = Router::new().route(
            "/freeswitch/restart",
            post(|| async {
                (StatusCode::OK, Json(json!({"success": true, "message": "FreeSWITCH restarted"})))
            }),
        );
        let client = serve(router).await;
        let msg = client.run_action(ServiceAction::RestartPbx).await.unwrap();
        assert_eq!(msg, "FreeSWITCH restarted");
    }

    #[tokio::test]
    async fn unreachable_console_is_an_http_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ConsoleClient::new(&format!("http://{addr}"), Duration::from_millis(500)).unwrap();
        let err = client.scan_wifi().await.unwrap_err();
        assert!(matches!(err, DashError::Http(_)));
    }

    #[tokio::test]
    async fn wifi_scan_lists_networks() {
        let router = Router::new().route(
            "/network/scan_wifi",
            get(|| async {
                Json(json!({"success": true, "networks": [
                    {"ssid": "home", "channel": 6, "security": "WPA2", "signal_strength": -48}
                ]}))
            }),
        );
        let client = serve(router).await;
        let networks = client.scan_wifi().await.unwrap();
        assert_eq!(networks[0].ssid, "home");
        assert_eq!(networks[0].signal_strength, Some(-48));
    }
}
