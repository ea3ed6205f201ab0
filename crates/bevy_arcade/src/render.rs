//! Turns the core's draw calls into sprites, text and gizmos.
//!
//! Surfaces are laid out left to right: the playfield at its native size,
//! then the camera preview, shrunk by half when it shares the window.

use bevy::color::Color;
use bevy::math::{Rect as BevyRect, Vec2, Vec3};
use bevy::prelude::{
    default, Commands, Component, DespawnRecursiveExt, DetectChanges, Entity, Gizmos, Handle,
    Image, Query, Res, Resource, Sprite, SpriteBundle, Text, Text2dBundle, TextStyle, Transform,
    With,
};
use bevy::sprite::Anchor;

use arcade_api::Rect;
use arcade_core::{FrameSlot, RenderCommand, Session, Surface};

use crate::arcade::DrawList;
use crate::webcam::{ReferenceImages, WebcamImage};

const SHARED_CAMERA_SCALE: f32 = 0.5;

/// Where a surface sits in the window, in logical pixels from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Vec2,
    pub size: Vec2,
    pub scale: f32,
}

impl Viewport {
    /// Window position of a surface pixel.
    pub fn to_window(&self, point: Vec2) -> Vec2 {
        self.origin + point * self.scale
    }

    /// Window position to a fraction of the surface.
    pub fn normalize(&self, window: Vec2) -> Vec2 {
        ((window - self.origin) / (self.size * self.scale)).clamp(Vec2::ZERO, Vec2::ONE)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Layout {
    game: Option<Viewport>,
    camera: Option<Viewport>,
    window: Vec2,
}

impl Layout {
    pub fn new(session: &Session) -> Self {
        let game = session.surface_size(Surface::Game).map(|size| Viewport {
            origin: Vec2::ZERO,
            size: size.as_vec2(),
            scale: 1.0,
        });
        let camera = session.surface_size(Surface::Camera).map(|size| {
            let (origin, scale) = match &game {
                Some(game) => (Vec2::new(game.size.x, 0.0), SHARED_CAMERA_SCALE),
                None => (Vec2::ZERO, 1.0),
            };
            Viewport {
                origin,
                size: size.as_vec2(),
                scale,
            }
        });

        let mut window = Vec2::ZERO;
        for viewport in [game, camera].into_iter().flatten() {
            let extent = viewport.origin + viewport.size * viewport.scale;
            window = window.max(extent);
        }
        Self {
            game,
            camera,
            window,
        }
    }

    pub fn window_size(&self) -> Vec2 {
        self.window
    }

    pub fn viewport(&self, surface: Surface) -> Option<Viewport> {
        match surface {
            Surface::Game => self.game,
            Surface::Camera => self.camera,
        }
    }

    /// World translation of a window position for the default 2D camera,
    /// which looks at the window centre with y up.
    fn to_world(&self, window: Vec2, z: f32) -> Vec3 {
        Vec3::new(
            window.x - self.window.x / 2.0,
            self.window.y / 2.0 - window.y,
            z,
        )
    }

    /// World centre and window size of a surface rectangle.
    fn place(&self, viewport: &Viewport, rect: Rect, z: f32) -> (Vec3, Vec2) {
        let top_left = viewport.to_window(Vec2::new(rect.x as f32, rect.y as f32));
        let size = Vec2::new(rect.w as f32, rect.h as f32) * viewport.scale;
        (self.to_world(top_left + size / 2.0, z), size)
    }
}

fn color(c: arcade_core::Color) -> Color {
    Color::srgb_u8(c.r, c.g, c.b)
}

/// Marks entities spawned for the current draw list.
#[derive(Component)]
pub struct Drawn;

pub fn spawn_drawables(
    mut commands: Commands,
    draw: Res<DrawList>,
    layout: Res<Layout>,
    webcam: Res<WebcamImage>,
    references: Res<ReferenceImages>,
    drawn: Query<Entity, With<Drawn>>,
) {
    if !draw.is_changed() {
        return;
    }
    for entity in &drawn {
        commands.entity(entity).despawn_recursive();
    }

    // Later commands land on top of earlier ones.
    for (order, command) in draw.0.iter().enumerate() {
        let Some(viewport) = layout.viewport(command.surface()) else {
            continue;
        };
        let z = order as f32 * 0.01;

        match command {
            RenderCommand::Clear { color: fill, .. } => {
                let area = Rect::new(0, 0, viewport.size.x as i32, viewport.size.y as i32);
                let (translation, size) = layout.place(&viewport, area, z);
                commands.spawn((solid(translation, size, color(*fill)), Drawn));
            }
            RenderCommand::Rect {
                rect,
                color: fill,
                filled: true,
                ..
            } => {
                let (translation, size) = layout.place(&viewport, *rect, z);
                commands.spawn((solid(translation, size, color(*fill)), Drawn));
            }
            RenderCommand::Frame {
                slot, source, dest, ..
            } => {
                let texture: Option<Handle<Image>> = match slot {
                    FrameSlot::Camera => webcam.ready.then(|| webcam.image.clone()),
                    FrameSlot::Reference(index) => references
                        .images
                        .as_ref()
                        .and_then(|images| images.get(*index).cloned()),
                };
                let Some(texture) = texture else {
                    continue;
                };
                let (translation, size) = layout.place(&viewport, *dest, z);
                let rect = source.map(|r| {
                    BevyRect::new(r.x as f32, r.y as f32, r.right() as f32, r.bottom() as f32)
                });
                commands.spawn((
                    SpriteBundle {
                        sprite: Sprite {
                            custom_size: Some(size),
                            rect,
                            ..default()
                        },
                        texture,
                        transform: Transform::from_translation(translation),
                        ..default()
                    },
                    Drawn,
                ));
            }
            RenderCommand::Text {
                position,
                text,
                color: fill,
                size,
                ..
            } => {
                let window = viewport.to_window(position.as_vec2());
                commands.spawn((
                    Text2dBundle {
                        text: Text::from_section(
                            text.clone(),
                            TextStyle {
                                font_size: size * viewport.scale,
                                color: color(*fill),
                                ..default()
                            },
                        ),
                        text_anchor: Anchor::TopLeft,
                        transform: Transform::from_translation(layout.to_world(window, z)),
                        ..default()
                    },
                    Drawn,
                ));
            }
            RenderCommand::Rect { filled: false, .. } | RenderCommand::Circle { .. } => {}
        }
    }
}

fn solid(translation: Vec3, size: Vec2, color: Color) -> SpriteBundle {
    SpriteBundle {
        sprite: Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        transform: Transform::from_translation(translation),
        ..default()
    }
}

/// Outlines and circles are immediate mode and redrawn every frame.
pub fn draw_gizmos(mut gizmos: Gizmos, draw: Res<DrawList>, layout: Res<Layout>) {
    for command in &draw.0 {
        let Some(viewport) = layout.viewport(command.surface()) else {
            continue;
        };
        match command {
            RenderCommand::Rect {
                rect,
                color: stroke,
                filled: false,
                ..
            } => {
                let (center, size) = layout.place(&viewport, *rect, 0.0);
                gizmos.rect_2d(center.truncate(), 0.0, size, color(*stroke));
            }
            RenderCommand::Circle {
                center,
                radius,
                color: stroke,
                ..
            } => {
                let window = viewport.to_window(center.as_vec2());
                let world = layout.to_world(window, 0.0).truncate();
                gizmos.circle_2d(world, *radius as f32 * viewport.scale, color(*stroke));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use arcade_core::{ArcadeConfig, ControlMode, Demo};

    use super::*;

    #[test]
    fn face_pong_shares_the_window() {
        let session = Session::new(Demo::Pong, None, &ArcadeConfig::default()).unwrap();
        let layout = Layout::new(&session);
        assert_eq!(layout.window_size(), Vec2::new(600.0 + 640.0, 800.0));
        let camera = layout.viewport(Surface::Camera).unwrap();
        assert_eq!(
            camera.to_window(Vec2::new(1280.0, 720.0)),
            Vec2::new(1240.0, 360.0)
        );
    }

    #[test]
    fn mouse_blocks_only_have_a_playfield() {
        let config = ArcadeConfig::default();
        let session = Session::new(Demo::Blocks, Some(ControlMode::Mouse), &config).unwrap();
        let layout = Layout::new(&session);
        assert!(layout.viewport(Surface::Camera).is_none());
        let game = layout.viewport(Surface::Game).unwrap();
        assert_eq!(
            game.normalize(Vec2::new(640.0, 180.0)),
            Vec2::new(0.5, 0.25)
        );
    }

    #[test]
    fn surface_rects_map_to_world_space() {
        let session = Session::new(Demo::Faces, None, &ArcadeConfig::default()).unwrap();
        let layout = Layout::new(&session);
        let viewport = layout.viewport(Surface::Camera).unwrap();
        let (center, size) = layout.place(&viewport, Rect::new(0, 0, 1280, 720), 1.0);
        assert_eq!(center, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(size, Vec2::new(1280.0, 720.0));
    }
}
