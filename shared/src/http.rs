//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Standard API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Response<Body> {
    let payload = serde_json::to_string(data)
        .unwrap_or_else(|_| r#"{"success":false,"error":"serialization failure"}"#.to_string());
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(payload))
        .expect("response builder with static parts")
}

/// Create an error response with the given status code and message.
pub fn error_response(status: u16, message: impl Into<String>) -> Response<Body> {
    json_response(status, &ApiResponse::<()>::error(message))
}

/// Create a 200 HTML response.
pub fn html_response(html: String) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("content-type", "text/html; charset=utf-8")
        .body(Body::from(html))
        .expect("response builder with static parts")
}

/// Parse a JSON request body, or produce the 400 response to return.
pub fn parse_json_body<T: DeserializeOwned>(body: &Body) -> Result<T, Response<Body>> {
    serde_json::from_slice(body.as_ref())
        .map_err(|e| error_response(400, format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_serializes_without_data() {
        let response = error_response(400, "bad input");
        let body = String::from_utf8(response.body().as_ref().to_vec()).expect("utf8");
        assert!(body.contains(r#""success":false"#));
        assert!(body.contains("bad input"));
        assert!(!body.contains("data"));
    }

    #[test]
    fn invalid_json_body_maps_to_400() {
        let result: Result<serde_json::Value, _> = parse_json_body(&Body::from("not json"));
        let response = result.expect_err("rejects");
        assert_eq!(response.status(), 400);
    }
}
