use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Token the server expects in `x-csrftoken` when none is configured.
pub const DEFAULT_CSRF_TOKEN: &str = "test-csrf-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Widget {
    pub id: Uuid,
    pub name: String,
    pub size: u32,
}

#[derive(Deserialize)]
pub struct CreateWidget {
    pub name: String,
    #[serde(default)]
    pub size: u32,
}

#[derive(Deserialize)]
pub struct UpdateWidget {
    pub name: Option<String>,
    pub size: Option<u32>,
}

#[derive(Deserialize)]
pub struct DeleteWidgets {
    pub ids: Vec<Uuid>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Widget>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    csrf_token: Arc<str>,
}

/// JSON error body in the `{"detail": ...}` shape.
pub struct Failure {
    status: StatusCode,
    body: serde_json::Value,
}

impl Failure {
    fn detail(status: StatusCode, detail: &str) -> Self {
        Self {
            status,
            body: json!({ "detail": detail }),
        }
    }

    fn not_found() -> Self {
        Self::detail(StatusCode::NOT_FOUND, "Not found.")
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_token(DEFAULT_CSRF_TOKEN)
}

pub fn app_with_token(csrf_token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(HashMap::new())),
        csrf_token: Arc::from(csrf_token),
    };
    Router::new()
        .route(
            "/widgets",
            get(list_widgets).post(create_widget).delete(delete_widgets),
        )
        .route(
            "/widgets/{id}",
            get(get_widget).put(update_widget).delete(delete_widget),
        )
        .route("/broken", get(broken))
        .route("/bare-failure", get(bare_failure))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn check_csrf(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let sent = headers.get("x-csrftoken").and_then(|v| v.to_str().ok());
    if sent == Some(&*state.csrf_token) {
        return Ok(());
    }
    log::debug!("rejecting request with csrf token {sent:?}");
    Err(Failure::detail(
        StatusCode::FORBIDDEN,
        "CSRF Failed: CSRF token missing or incorrect.",
    ))
}

async fn list_widgets(State(state): State<AppState>) -> Json<Vec<Widget>> {
    let widgets = state.db.read().await;
    let mut all: Vec<Widget> = widgets.values().cloned().collect();
    all.sort_by(|a, b| a.name.cmp(&b.name));
    Json(all)
}

async fn create_widget(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateWidget>,
) -> Result<(StatusCode, Json<Widget>), Failure> {
    check_csrf(&state, &headers)?;
    if input.name.trim().is_empty() {
        return Err(Failure {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "name": ["This field may not be blank."] }),
        });
    }
    let widget = Widget {
        id: Uuid::new_v4(),
        name: input.name,
        size: input.size,
    };
    state.db.write().await.insert(widget.id, widget.clone());
    Ok((StatusCode::CREATED, Json(widget)))
}

async fn get_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Widget>, Failure> {
    let widgets = state.db.read().await;
    widgets
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(Failure::not_found)
}

async fn update_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<UpdateWidget>,
) -> Result<Json<Widget>, Failure> {
    check_csrf(&state, &headers)?;
    let mut widgets = state.db.write().await;
    let widget = widgets.get_mut(&id).ok_or_else(Failure::not_found)?;
    if let Some(name) = input.name {
        widget.name = name;
    }
    if let Some(size) = input.size {
        widget.size = size;
    }
    Ok(Json(widget.clone()))
}

async fn delete_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Failure> {
    check_csrf(&state, &headers)?;
    let mut widgets = state.db.write().await;
    widgets
        .remove(&id)
        .map(|w| Json(json!({ "deleted": w.id })))
        .ok_or_else(Failure::not_found)
}

async fn delete_widgets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<DeleteWidgets>,
) -> Result<Json<serde_json::Value>, Failure> {
    check_csrf(&state, &headers)?;
    let mut widgets = state.db.write().await;
    let deleted = input
        .ids
        .iter()
        .filter(|id| widgets.remove(*id).is_some())
        .count();
    Ok(Json(json!({ "deleted": deleted })))
}

/// A gateway-style HTML error page.
async fn broken() -> impl IntoResponse {
    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body><h1>502 Bad Gateway</h1></body></html>",
    )
}

/// A JSON error body sent without any content-type header.
async fn bare_failure() -> Response {
    let mut response = Response::new(Body::from(r#"{"message":"upstream unavailable"}"#));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
