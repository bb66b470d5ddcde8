use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Widget, DEFAULT_CSRF_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("x-csrftoken", DEFAULT_CSRF_TOKEN)
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn content_type(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

// --- list ---

#[tokio::test]
async fn list_widgets_empty() {
    let resp = app().oneshot(get_request("/widgets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), Some("application/json"));
    let widgets: Vec<Widget> = body_json(resp).await;
    assert!(widgets.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_widget_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/widgets", r#"{"name":"Bolt","size":3}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let widget: Widget = body_json(resp).await;
    assert_eq!(widget.name, "Bolt");
    assert_eq!(widget.size, 3);
}

#[tokio::test]
async fn create_widget_without_csrf_token_is_forbidden() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/widgets")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"name":"Bolt"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "CSRF Failed: CSRF token missing or incorrect.");
}

#[tokio::test]
async fn create_widget_blank_name_returns_field_errors() {
    let resp = app()
        .oneshot(json_request("POST", "/widgets", r#"{"name":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["name"][0], "This field may not be blank.");
}

#[tokio::test]
async fn create_widget_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/widgets", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_widget_not_found() {
    let resp = app()
        .oneshot(get_request("/widgets/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "Not found.");
}

#[tokio::test]
async fn get_widget_bad_uuid_returns_plain_text_400() {
    let resp = app().oneshot(get_request("/widgets/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(content_type(&resp).unwrap().starts_with("text/plain"));
}

// --- update / delete ---

#[tokio::test]
async fn update_widget_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/widgets/00000000-0000-0000-0000-000000000000",
            r#"{"name":"Nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_widget_without_csrf_token_is_forbidden() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/widgets/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- non-JSON failures ---

#[tokio::test]
async fn broken_returns_html() {
    let resp = app().oneshot(get_request("/broken")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(content_type(&resp), Some("text/html"));
    let body = body_bytes(resp).await;
    assert!(body.starts_with(b"<html>"));
}

#[tokio::test]
async fn bare_failure_has_no_content_type() {
    let resp = app().oneshot(get_request("/bare-failure")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&resp), None);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "upstream unavailable");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    let mut ids = Vec::new();
    for name in ["Bolt", "Nut"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/widgets", &format!(r#"{{"name":"{name}"}}"#)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Widget = body_json(resp).await;
        ids.push(created.id);
    }

    // list, sorted by name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/widgets"))
        .await
        .unwrap();
    let widgets: Vec<Widget> = body_json(resp).await;
    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0].name, "Bolt");

    // update — partial: only size
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/widgets/{}", ids[0]), r#"{"size":9}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Widget = body_json(resp).await;
    assert_eq!(updated.name, "Bolt"); // unchanged
    assert_eq!(updated.size, 9);

    // delete one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", &format!("/widgets/{}", ids[0]), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["deleted"], ids[0].to_string());

    // bulk delete — only the remaining id counts
    let bulk = serde_json::json!({ "ids": ids }).to_string();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", "/widgets", &bulk))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["deleted"], 1);

    // list after delete — empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/widgets"))
        .await
        .unwrap();
    let widgets: Vec<Widget> = body_json(resp).await;
    assert!(widgets.is_empty());
}
