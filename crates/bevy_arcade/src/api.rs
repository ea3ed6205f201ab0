use std::sync::Arc;

use axum::{Json, Router};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::put;
use axum_extra::TypedHeader;
use bevy::app::AppExit;
use bevy::prelude::{Assets, EventWriter, Image, ResMut, Resource};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bytes::Bytes;
use headers::ContentLength;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, error};

use arcade_api::{
    ApiError, SetCameraRequest, SetFacesRequest, SetHandsRequest, SetVerificationRequest,
};
use arcade_core::source::{check_rgba, FrameSource};
use arcade_core::CaptureError;

use crate::arcade::PendingInput;
use crate::webcam::WebcamImage;

pub enum Command {
    SetFaces(SetFacesRequest),
    SetHands(SetHandsRequest),
    SetVerification(SetVerificationRequest),
    SetCamera(SetCameraRequest),
}

pub struct ApiState {
    tx: mpsc::UnboundedSender<Command>,
}

impl ApiState {
    pub fn new() -> (Arc<Self>, ApiResource) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self {
            tx,
        }), ApiResource {
            rx
        })
    }

    fn send(&self, command: Command) -> Result<StatusCode, ApiError> {
        self.tx.send(command).map_err(|_| ApiError::unavailable())?;
        Ok(StatusCode::OK)
    }
}

fn dimension(headers: &HeaderMap, name: &'static str) -> Result<u32, ApiError> {
    headers.get(name)
        .and_then(|w| w.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| ApiError::invalid_argument(format!("missing {}", name)))
}

async fn put_camera(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    TypedHeader(ContentLength(content_length)): TypedHeader<ContentLength>,
    payload: Bytes,
) -> Result<StatusCode, ApiError> {
    let width = dimension(&headers, "width")?;
    let height = dimension(&headers, "height")?;

    check_rgba(width, height, content_length as usize)
        .and_then(|_| check_rgba(width, height, payload.len()))
        .map_err(|err| ApiError::invalid_argument(err.to_string()))?;

    state.send(Command::SetCamera(SetCameraRequest {
        width,
        height,
        payload,
    }))
}

async fn put_faces(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SetFacesRequest>,
) -> Result<StatusCode, ApiError> {
    state.send(Command::SetFaces(request))
}

async fn put_hands(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SetHandsRequest>,
) -> Result<StatusCode, ApiError> {
    state.send(Command::SetHands(request))
}

async fn put_verification(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SetVerificationRequest>,
) -> Result<StatusCode, ApiError> {
    state.send(Command::SetVerification(request))
}

pub fn new_api() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/v1/camera", put(put_camera))
        .route("/v1/faces", put(put_faces))
        .route("/v1/hands", put(put_hands))
        .route("/v1/verification", put(put_verification))
        .layer(DefaultBodyLimit::disable())
}

/// Receiving end of the tracker feed. The feed is gone once the server task
/// has stopped and dropped its sender.
#[derive(Resource)]
pub struct ApiResource {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl FrameSource for ApiResource {
    type Frame = Command;

    fn next_frame(&mut self) -> Result<Option<Command>, CaptureError> {
        match self.rx.try_recv() {
            Ok(command) => Ok(Some(command)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(CaptureError::Disconnected),
        }
    }
}

pub fn update_api(
    mut api: ResMut<ApiResource>,
    mut pending: ResMut<PendingInput>,
    mut webcam: ResMut<WebcamImage>,
    mut images: ResMut<Assets<Image>>,
    mut exit: EventWriter<AppExit>,
) {
    loop {
        let command = match api.next_frame() {
            Ok(Some(command)) => command,
            Ok(None) => break,
            Err(err) => {
                error!("tracker feed lost: {}", err);
                exit.send(AppExit::error());
                break;
            }
        };

        match command {
            Command::SetFaces(request) => {
                debug!(faces = request.faces.len(), "faces received");
                pending.0.faces = Some(request.faces);
            }
            Command::SetHands(request) => {
                debug!(hands = request.hands.len(), "hands received");
                pending.0.hands = Some(request.hands);
            }
            Command::SetVerification(request) => {
                pending.0.verification = Some(request.verification);
            }
            Command::SetCamera(request) => {
                let size = Extent3d {
                    width: request.width,
                    height: request.height,
                    depth_or_array_layers: 1,
                };
                let image = Image::new(
                    size,
                    TextureDimension::D2,
                    request.payload.to_vec(),
                    TextureFormat::Rgba8UnormSrgb,
                    RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
                );
                images.insert(webcam.image.id(), image);
                webcam.ready = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use arcade_api::{ErrorCategory, SetFacesRequest};

    use super::*;

    fn headers(width: &'static str, height: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("width", HeaderValue::from_static(width));
        headers.insert("height", HeaderValue::from_static(height));
        headers
    }

    #[test]
    fn missing_dimension_is_a_bad_request() {
        let err = dimension(&HeaderMap::new(), "width").unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidArgument);
        assert_eq!(err.category.to_status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(dimension(&headers("640", "x"), "width").unwrap(), 640);
        assert!(dimension(&headers("640", "x"), "height").is_err());
    }

    #[test]
    fn camera_frame_must_match_its_size() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (state, mut resource) = ApiState::new();

        let short = runtime.block_on(put_camera(
            State(state.clone()),
            headers("2", "2"),
            TypedHeader(ContentLength(12)),
            Bytes::from(vec![0; 12]),
        ));
        assert_eq!(short.unwrap_err().category, ErrorCategory::InvalidArgument);
        assert!(matches!(resource.next_frame(), Ok(None)));

        let ok = runtime.block_on(put_camera(
            State(state),
            headers("2", "2"),
            TypedHeader(ContentLength(16)),
            Bytes::from(vec![0; 16]),
        ));
        assert_eq!(ok.unwrap(), StatusCode::OK);
        assert!(matches!(
            resource.next_frame(),
            Ok(Some(Command::SetCamera(SetCameraRequest { width: 2, height: 2, .. })))
        ));
    }

    #[test]
    fn stopped_server_disconnects_the_feed() {
        let (state, mut resource) = ApiState::new();
        state.send(Command::SetFaces(SetFacesRequest { faces: Vec::new() })).unwrap();
        drop(state);

        assert!(matches!(resource.next_frame(), Ok(Some(Command::SetFaces(_)))));
        assert!(matches!(resource.next_frame(), Err(CaptureError::Disconnected)));
    }
}
