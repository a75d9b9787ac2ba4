//! Scoreboard client for the leaderboard HTTP API (WASM only)
//!
//! Endpoints (JSON bodies):
//! - `GET  /api/check-username?name=` -> `{ taken }`
//! - `POST /api/register-username { name }` -> `{ success, reason? }`
//! - `POST /api/leaderboard { username, score }` -> `{ success }`
//! - `GET  /api/leaderboard` -> `[{ username, score }]`
//! - `POST /api/update-username { old, new }` -> `{ success }`

use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use super::error::ScoreboardError;
use super::{LeaderboardEntry, Registration, Rename, ScoreboardService, UsernameStatus};

#[derive(Debug, Deserialize)]
struct Ack {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`ScoreboardService`] over `fetch`
#[derive(Debug, Clone)]
pub struct HttpScoreboard {
    base_url: String,
}

impl HttpScoreboard {
    /// `base_url` is prepended to every endpoint path ("" for same origin)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ScoreboardError> {
        let url = format!("{}{}", self.base_url, path);

        let init = RequestInit::new();
        init.set_method(method);
        if let Some(body) = body {
            let headers = Headers::new().map_err(js_network)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(js_network)?;
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body.to_string()));
        }

        let request = Request::new_with_str_and_init(&url, &init).map_err(js_network)?;
        let window = web_sys::window()
            .ok_or_else(|| ScoreboardError::NetworkUnavailable("no window".to_string()))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_network)?
            .dyn_into()
            .map_err(|_| ScoreboardError::Protocol("fetch did not return a Response".to_string()))?;

        let text = JsFuture::from(response.text().map_err(js_network)?)
            .await
            .map_err(js_network)?
            .as_string()
            .unwrap_or_default();

        if response.status() == 400 {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(ScoreboardError::InputRejected(message));
        }
        if !response.ok() {
            return Err(ScoreboardError::NetworkUnavailable(format!(
                "{method} {path} returned {}",
                response.status()
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| ScoreboardError::Protocol(format!("{method} {path}: {e}")))
    }
}

fn js_network(err: JsValue) -> ScoreboardError {
    ScoreboardError::NetworkUnavailable(format!("{err:?}"))
}

impl ScoreboardService for HttpScoreboard {
    async fn check_username(&self, name: &str) -> Result<UsernameStatus, ScoreboardError> {
        let encoded = String::from(js_sys::encode_uri_component(name));
        self.request("GET", &format!("/api/check-username?name={encoded}"), None)
            .await
    }

    async fn register_username(&self, name: &str) -> Result<Registration, ScoreboardError> {
        self.request(
            "POST",
            "/api/register-username",
            Some(serde_json::json!({ "name": name })),
        )
        .await
    }

    async fn submit_score(&self, username: &str, score: u64) -> Result<(), ScoreboardError> {
        let ack: Ack = self
            .request(
                "POST",
                "/api/leaderboard",
                Some(serde_json::json!({ "username": username, "score": score })),
            )
            .await?;
        if ack.success {
            Ok(())
        } else {
            Err(ScoreboardError::Protocol("score submission refused".to_string()))
        }
    }

    async fn rename_username(&self, old: &str, new: &str) -> Result<Rename, ScoreboardError> {
        self.request(
            "POST",
            "/api/update-username",
            Some(serde_json::json!({ "old": old, "new": new })),
        )
        .await
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreboardError> {
        self.request("GET", "/api/leaderboard", None).await
    }
}
