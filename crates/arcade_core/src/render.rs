use glam::IVec2;
use serde::{Deserialize, Serialize};

use arcade_api::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Which drawing area a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The playfield: pong court or block playground.
    Game,
    /// The camera preview with tracker overlays.
    Camera,
}

/// Images the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    /// The latest camera frame pushed by the tracker.
    Camera,
    /// One of the two reference images of the verification demo.
    Reference(usize),
}

/// A draw call. Coordinates are pixels of the target surface, top-left
/// origin, y down.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear {
        surface: Surface,
        color: Color,
    },
    Frame {
        surface: Surface,
        slot: FrameSlot,
        /// Region of the image to draw, the whole image when `None`.
        source: Option<Rect>,
        dest: Rect,
    },
    Rect {
        surface: Surface,
        rect: Rect,
        color: Color,
        filled: bool,
    },
    Circle {
        surface: Surface,
        center: IVec2,
        radius: i32,
        color: Color,
    },
    Text {
        surface: Surface,
        position: IVec2,
        text: String,
        color: Color,
        size: f32,
    },
}

impl RenderCommand {
    pub fn surface(&self) -> Surface {
        match self {
            RenderCommand::Clear { surface, .. }
            | RenderCommand::Frame { surface, .. }
            | RenderCommand::Rect { surface, .. }
            | RenderCommand::Circle { surface, .. }
            | RenderCommand::Text { surface, .. } => *surface,
        }
    }
}
