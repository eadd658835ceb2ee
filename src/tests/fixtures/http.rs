// Request builders and body readers for router level tests.

use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn new_auction_body(title: &str, starting_price: i64) -> Value {
    json!({
        "title": title,
        "starting_price": starting_price,
        "ends_at": Utc::now().timestamp_millis() + 3_600_000,
    })
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
