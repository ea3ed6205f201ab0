//! Draw calls for the camera preview: face boxes, labels, player regions,
//! hand cursors and the verification view.

use glam::IVec2;

use arcade_api::{FaceDetection, HandLandmarks, Rect, Verification};

use crate::input::{HandGestureMapper, Players, LANDMARK_COUNT};
use crate::render::{Color, FrameSlot, RenderCommand, Surface};

pub const LABEL_SIZE: f32 = 32.0;
pub const VERIFICATION_CROP: i32 = 512;
pub const VERIFICATION_PADDING: f32 = 0.2;

fn outline(rect: Rect, color: Color) -> RenderCommand {
    RenderCommand::Rect {
        surface: Surface::Camera,
        rect,
        color,
        filled: false,
    }
}

fn label(position: IVec2, text: impl Into<String>, color: Color) -> RenderCommand {
    RenderCommand::Text {
        surface: Surface::Camera,
        position,
        text: text.into(),
        color,
        size: LABEL_SIZE,
    }
}

/// The camera frame stretched over the whole preview.
pub fn camera_frame(width: i32, height: i32) -> RenderCommand {
    RenderCommand::Frame {
        surface: Surface::Camera,
        slot: FrameSlot::Camera,
        source: None,
        dest: Rect::new(0, 0, width, height),
    }
}

fn boxed_label(area: Rect, text: String) -> [RenderCommand; 2] {
    [
        outline(area, Color::GREEN),
        label(IVec2::new(area.x + 5, area.y - 5), text, Color::GREEN),
    ]
}

pub fn detection_overlay(faces: &[FaceDetection]) -> Vec<RenderCommand> {
    faces
        .iter()
        .flat_map(|face| boxed_label(face.facial_area, format!("{:.2}%", face.confidence * 100.0)))
        .collect()
}

/// Faces without an emotion still get their box, with an empty label.
pub fn emotion_overlay(faces: &[FaceDetection]) -> Vec<RenderCommand> {
    faces
        .iter()
        .flat_map(|face| {
            let emotion = face.dominant_emotion.clone().unwrap_or_default();
            boxed_label(face.facial_area, emotion)
        })
        .collect()
}

/// Player regions and the face currently steering each paddle.
pub fn roi_overlay(
    left: Rect,
    right: Rect,
    players: &Players<'_>,
    left_color: Color,
    right_color: Color,
) -> Vec<RenderCommand> {
    let mut commands = vec![outline(left, left_color), outline(right, right_color)];
    let tagged = [
        (players.left, "Player 1", left_color),
        (players.right, "Player 2", right_color),
    ];
    for (face, name, color) in tagged {
        if let Some(face) = face {
            let area = face.facial_area;
            commands.push(outline(area, color));
            commands.push(label(IVec2::new(area.x, area.y), name, color));
        }
    }
    commands
}

/// Palm cursors, with a larger green disc while pinching.
pub fn hand_overlay(mapper: &HandGestureMapper, hands: &[HandLandmarks]) -> Vec<RenderCommand> {
    let mut commands = Vec::new();
    for hand in hands.iter().filter(|h| h.points.len() >= LANDMARK_COUNT) {
        let center = mapper.palm(&hand.points).as_ivec2();
        commands.push(RenderCommand::Circle {
            surface: Surface::Camera,
            center,
            radius: 10,
            color: Color::RED,
        });
        if mapper.is_pinch(&hand.points) {
            commands.push(RenderCommand::Circle {
                surface: Surface::Camera,
                center,
                radius: 20,
                color: Color::GREEN,
            });
        }
    }
    commands
}

/// Square crop around a face: the longer side plus `padding` of it on every
/// side, pushed back inside the frame.
pub fn crop_face(frame: IVec2, area: Rect, padding: f32) -> Rect {
    let side = area.w.max(area.h);
    let pad = (side as f32 * padding) as i32;
    let mut x = area.x + (area.w - side).div_euclid(2) - pad;
    let mut y = area.y + (area.h - side).div_euclid(2) - pad;
    let side = side + pad * 2;

    x = x.max(0);
    y = y.max(0);
    if x + side > frame.x {
        x = frame.x - side;
    }
    if y + side > frame.y {
        y = frame.y - side;
    }
    Rect::new(x, y, side, side)
}

/// Maps `area` from image pixels into a crop drawn at `dest`.
fn into_crop(area: Rect, crop: Rect, dest: Rect) -> Rect {
    let scale = dest.w as f32 / crop.w.max(1) as f32;
    let map = |v: i32| (v as f32 * scale).round() as i32;
    Rect::new(
        dest.x + map(area.x - crop.x),
        dest.y + map(area.y - crop.y),
        map(area.w),
        map(area.h),
    )
}

/// Both reference faces cropped side by side with the verdict in the middle.
pub fn verification_overlay(verification: &Verification, sizes: [IVec2; 2]) -> Vec<RenderCommand> {
    let mut commands = vec![RenderCommand::Clear {
        surface: Surface::Camera,
        color: Color::BLACK,
    }];
    let areas = [verification.img1, verification.img2];

    for (slot, (area, size)) in areas.into_iter().zip(sizes).enumerate() {
        let crop = crop_face(size, area, VERIFICATION_PADDING);
        let dest = Rect::new(
            slot as i32 * VERIFICATION_CROP,
            0,
            VERIFICATION_CROP,
            VERIFICATION_CROP,
        );
        commands.push(RenderCommand::Frame {
            surface: Surface::Camera,
            slot: FrameSlot::Reference(slot),
            source: Some(crop),
            dest,
        });
        commands.push(outline(into_crop(area, crop, dest), Color::GREEN));
    }

    let (text, color) = if verification.verified {
        ("Verified", Color::GREEN)
    } else {
        ("Not Verified", Color::RED)
    };
    commands.push(label(
        IVec2::new(VERIFICATION_CROP - 50, VERIFICATION_CROP / 2),
        text,
        color,
    ));
    commands
}
