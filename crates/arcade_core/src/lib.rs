//! Engine independent core of the camera arcade.
//!
//! Tracker output comes in as [`arcade_api`] types, goes through the
//! [`input`] mappers into the [`pong`] and [`blocks`] models, and comes out
//! as [`render::RenderCommand`]s. [`session::Session`] ties one demo
//! together behind a single tick function.

pub mod blocks;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod overlay;
pub mod pong;
pub mod render;
pub mod session;
pub mod source;

pub use config::ArcadeConfig;
pub use error::{CaptureError, ConfigError};
pub use render::{Color, FrameSlot, RenderCommand, Surface};
pub use session::{ControlMode, Demo, FrameInput, Session};
