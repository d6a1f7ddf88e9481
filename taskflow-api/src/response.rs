/// Success envelope
///
/// Every successful response is `{ "success": true, "data": ... }`, with
/// `count` added for lists. Failures use [`crate::error::ErrorResponse`].

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with `data`
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            count: None,
            data,
        })
    }

    /// 201 with `data`
    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(data))
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// 200 with `data` and `count`
    pub fn list(items: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: Some(items.len()),
            data: items,
        })
    }
}

/// `{ "success": true, "data": {} }`, used by deletes and logout
pub fn empty() -> Json<Envelope<Value>> {
    Envelope::ok(json!({}))
}
