use std::borrow::Cow;
use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};

use bytes::Bytes;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCategory {
    Cancelled,
    InvalidArgument,
}

impl ErrorCategory {
    pub fn to_status_code(self) -> StatusCode {
        match self {
            ErrorCategory::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::InvalidArgument => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub category: ErrorCategory,
    pub error_code: Cow<'static, str>,
    pub instance_id: String,
    pub message: Cow<'static, str>,
}

impl ApiError {
    pub fn with_message(
        category: ErrorCategory,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            category,
            error_code: code.into(),
            instance_id: nanoid::nanoid!(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorCategory::InvalidArgument, "invalid_argument", message)
    }

    pub fn unavailable() -> Self {
        Self::with_message(ErrorCategory::Cancelled, "unavailable", "arcade is shutting down")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.category.to_status_code();
        (status_code, Json(self)).into_response()
    }
}

/// Pixel rectangle with a top-left origin, y growing downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }
}

/// One face found by the tracker in the current camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDetection {
    pub facial_area: Rect,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub dominant_emotion: Option<String>,
}

/// Landmarks of one hand, normalized to the camera frame.
///
/// Points follow the usual 21 joint numbering: 0 is the wrist, 4 the thumb
/// tip, 8 the index tip and 5/9/13/17 the finger bases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    #[serde(default)]
    pub id: Option<u32>,
    pub points: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub verified: bool,
    pub img1: Rect,
    pub img2: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFacesRequest {
    pub faces: Vec<FaceDetection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetHandsRequest {
    pub hands: Vec<HandLandmarks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVerificationRequest {
    pub verification: Verification,
}

/// An RGBA8 camera frame.
#[derive(Debug, Clone)]
pub struct SetCameraRequest {
    pub width: u32,
    pub height: u32,
    pub payload: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_request_accepts_tracker_json() {
        let body = r#"{"faces":[{"facialArea":{"x":10,"y":20,"w":30,"h":40},"confidence":0.9}]}"#;
        let request: SetFacesRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.faces.len(), 1);
        assert_eq!(request.faces[0].facial_area, Rect::new(10, 20, 30, 40));
        assert_eq!(request.faces[0].dominant_emotion, None);
    }

    #[test]
    fn hands_without_id() {
        let body = r#"{"hands":[{"points":[[0.5,0.25]]}]}"#;
        let request: SetHandsRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.hands[0].id, None);
        assert_eq!(request.hands[0].points[0], Vec2::new(0.5, 0.25));
    }

    #[test]
    fn error_status_codes() {
        let invalid = ApiError::invalid_argument("bad");
        assert_eq!(invalid.category.to_status_code(), StatusCode::BAD_REQUEST);
        let unavailable = ApiError::unavailable();
        assert_eq!(unavailable.category.to_status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::new(5, 6, 10, 20);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 26);
        assert_eq!(rect.area(), 200);
    }
}
