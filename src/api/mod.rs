use crate::models::{Board, Note, NoteId, NotePatch};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:1906".to_string();

        // Deployment injects `window.ENV.API_URL`; fall back to the dev
        // server the backend binds by default.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct CreateBoardRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapping: Option<bool>,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct CreateNoteRequest {
    pub board_id: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub content: String,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct CreatedNote {
    pub id: NoteId,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct CreatedBoard {
    pub id: i64,
    pub name: String,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    /// Fire a request where only success/failure matters; tolerates any
    /// response body shape.
    async fn request_ok(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<()> {
        let _: serde_json::Value = self.request(method, path, body).await?;
        Ok(())
    }

    pub async fn list_boards(&self) -> ApiResult<Vec<Board>> {
        self.request(reqwest::Method::GET, "/api/boards", None::<&()>)
            .await
    }

    pub async fn create_board(&self, name: &str) -> ApiResult<CreatedBoard> {
        self.request(
            reqwest::Method::POST,
            "/api/boards",
            Some(&CreateBoardRequest {
                name: name.to_string(),
            }),
        )
        .await
    }

    pub async fn patch_board(&self, board_id: i64, patch: &BoardPatch) -> ApiResult<()> {
        self.request_ok(
            reqwest::Method::PATCH,
            &format!("/api/boards/{board_id}"),
            Some(patch),
        )
        .await
    }

    pub async fn delete_board(&self, board_id: i64) -> ApiResult<()> {
        self.request_ok(
            reqwest::Method::DELETE,
            &format!("/api/boards/{board_id}"),
            None::<&()>,
        )
        .await
    }

    pub async fn duplicate_board(&self, board_id: i64) -> ApiResult<CreatedBoard> {
        self.request(
            reqwest::Method::POST,
            &format!("/api/boards/{board_id}/duplicate"),
            None::<&()>,
        )
        .await
    }

    /// Notes come back ordered by id; z-order is reconstructed client-side.
    pub async fn list_notes(&self, board_id: i64) -> ApiResult<Vec<Note>> {
        self.request(
            reqwest::Method::GET,
            &format!("/api/boards/{board_id}/notes"),
            None::<&()>,
        )
        .await
    }

    pub async fn create_note(&self, req: &CreateNoteRequest) -> ApiResult<CreatedNote> {
        self.request(reqwest::Method::POST, "/api/notes", Some(req))
            .await
    }

    pub async fn patch_note(&self, note_id: NoteId, patch: &NotePatch) -> ApiResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.request_ok(
            reqwest::Method::PATCH,
            &format!("/api/notes/{note_id}"),
            Some(patch),
        )
        .await
    }

    pub async fn delete_note(&self, note_id: NoteId) -> ApiResult<()> {
        self.request_ok(
            reqwest::Method::DELETE,
            &format!("/api/notes/{note_id}"),
            None::<&()>,
        )
        .await
    }
}
