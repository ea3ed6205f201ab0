use bevy::app::AppExit;
use bevy::input::ButtonInput;
use bevy::math::Vec2;
use bevy::prelude::{
    AssetServer, Assets, EventReader, EventWriter, Image, KeyCode, Local, MouseButton, Res, ResMut,
    Resource,
};
use bevy::window::CursorMoved;
use rand::rngs::StdRng;

use arcade_core::input::{Pointer, PointerEvent};
use arcade_core::{ControlMode, FrameInput, RenderCommand, Session, Surface};

use crate::render::Layout;
use crate::webcam::ReferenceImages;

#[derive(Resource)]
pub struct ArcadeSession(pub Option<Session>);

/// Input collected since the last fixed tick.
#[derive(Resource, Default)]
pub struct PendingInput(pub FrameInput);

/// Draw calls produced by the last tick.
#[derive(Resource, Default)]
pub struct DrawList(pub Vec<RenderCommand>);

#[derive(Resource)]
pub struct ArcadeRng(pub StdRng);

fn axis(keys: &ButtonInput<KeyCode>, left: KeyCode, right: KeyCode) -> i32 {
    keys.pressed(right) as i32 - keys.pressed(left) as i32
}

pub fn read_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<ArcadeSession>,
    mut pending: ResMut<PendingInput>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.any_just_pressed([KeyCode::KeyQ, KeyCode::Escape]) {
        exit.send(AppExit::Success);
        return;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        pending.0.restart = true;
    }

    let Some(session) = &session.0 else {
        return;
    };
    if session.control() == Some(ControlMode::Key) {
        let top = axis(&keys, KeyCode::ArrowLeft, KeyCode::ArrowRight);
        let bottom = axis(&keys, KeyCode::KeyA, KeyCode::KeyD);
        pending.0.steer = Some((top, bottom));
    }
}

pub fn read_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    mut moved: EventReader<CursorMoved>,
    session: Res<ArcadeSession>,
    layout: Res<Layout>,
    mut pending: ResMut<PendingInput>,
    mut cursor: Local<Vec2>,
) {
    let mouse_control = session
        .0
        .as_ref()
        .is_some_and(|s| s.control() == Some(ControlMode::Mouse));
    if !mouse_control {
        moved.clear();
        return;
    }
    let Some(viewport) = layout.viewport(Surface::Game) else {
        return;
    };

    let pressed = buttons.pressed(MouseButton::Left);
    for event in moved.read() {
        *cursor = viewport.normalize(event.position);
        pending.0.pointer.push(PointerEvent::Move(Pointer {
            position: *cursor,
            click: pressed,
        }));
    }
    if buttons.just_pressed(MouseButton::Left) {
        pending.0.pointer.push(PointerEvent::Press(Pointer {
            position: *cursor,
            click: true,
        }));
    }
    if buttons.just_released(MouseButton::Left) {
        pending.0.pointer.push(PointerEvent::Release(Pointer {
            position: *cursor,
            click: false,
        }));
    }
}

/// Hands the reference picture sizes to the verification session once both
/// have loaded.
pub fn watch_references(
    references: Res<ReferenceImages>,
    images: Res<Assets<Image>>,
    mut pending: ResMut<PendingInput>,
    mut sent: Local<bool>,
) {
    if *sent {
        return;
    }
    let Some([a, b]) = &references.images else {
        return;
    };
    if let (Some(a), Some(b)) = (images.get(a), images.get(b)) {
        pending.0.references = Some([a.size().as_ivec2(), b.size().as_ivec2()]);
        *sent = true;
    }
}

pub fn load_references(
    options: Res<crate::Options>,
    asset_server: Res<AssetServer>,
    mut references: ResMut<ReferenceImages>,
) {
    if let (Some(a), Some(b)) = (&options.reference_a, &options.reference_b) {
        references.images = Some([asset_server.load(a.clone()), asset_server.load(b.clone())]);
    }
}

pub fn tick_session(
    mut session: ResMut<ArcadeSession>,
    mut pending: ResMut<PendingInput>,
    mut rng: ResMut<ArcadeRng>,
    mut draw: ResMut<DrawList>,
) {
    let Some(current) = session.0.take() else {
        return;
    };
    let input = std::mem::take(&mut pending.0);
    let (next, commands) = current.tick(input, &mut rng.0);
    session.0 = Some(next);
    draw.0 = commands;
}
