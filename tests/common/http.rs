use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

pub async fn request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Vec<u8>>,
    headers: &[(&str, String)],
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);

    for (k, v) in headers {
        builder = builder.header(*k, v.as_str());
    }

    let req = match body {
        Some(bytes) => builder.body(Body::from(bytes)).expect("request body"),
        None => builder.body(Body::empty()).expect("empty body"),
    };

    app.clone().oneshot(req).await.expect("oneshot response")
}

pub async fn post_image(app: &Router, bytes: Vec<u8>) -> (StatusCode, HeaderMap, Value) {
    let resp = request(app, Method::POST, "/detect", Some(bytes), &[]).await;
    response_json(resp).await
}

pub async fn response_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body bytes");

    let json = if bytes.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_slice::<Value>(&bytes).expect("parse json body")
    };

    (status, headers, json)
}

pub fn assert_json_error(body: &Value, message: &str) {
    assert_eq!(body, &serde_json::json!({ "error": message }));
}

pub fn assert_keys(body: &Value, keys: &[&str]) {
    let obj = body.as_object().expect("json object");
    let mut actual: Vec<&str> = obj.keys().map(String::as_str).collect();
    actual.sort_unstable();
    let mut expected = keys.to_vec();
    expected.sort_unstable();
    assert_eq!(actual, expected);
}
