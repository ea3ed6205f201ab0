use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use tracing::debug;

use arcade_api::HandLandmarks;

use crate::input::InputMapper;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const RING_MCP: usize = 13;
pub const PINKY_MCP: usize = 17;
pub const LANDMARK_COUNT: usize = 21;

const PALM: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Cursor position normalized to the camera frame, plus the click state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub position: Vec2,
    pub click: bool,
}

impl Pointer {
    pub fn new(x: f32, y: f32, click: bool) -> Self {
        Self {
            position: Vec2::new(x, y),
            click,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Pointer),
    Press(Pointer),
    Release(Pointer),
}

impl PointerEvent {
    pub fn pointer(&self) -> &Pointer {
        match self {
            PointerEvent::Move(p) | PointerEvent::Press(p) | PointerEvent::Release(p) => p,
        }
    }
}

/// Identifies a hand across frames. Tracker ids and list positions never
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandKey {
    Tracked(u32),
    Index(usize),
}

impl HandKey {
    fn of(hand: &HandLandmarks, index: usize) -> Self {
        match hand.id {
            Some(id) => HandKey::Tracked(id),
            None => HandKey::Index(index),
        }
    }
}

/// What is remembered about one tracked hand between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandContext {
    pub click: bool,
    /// Last position sent for this hand.
    pub position: Vec2,
    /// Eased cursor, only kept when easing is enabled.
    pub cursor: Option<Vec2>,
}

#[derive(Debug, Clone, Default)]
pub struct HandContexts {
    hands: BTreeMap<HandKey, HandContext>,
}

impl HandContexts {
    pub fn get(&self, key: HandKey) -> Option<&HandContext> {
        self.hands.get(&key)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

/// Emits one pointer event per tracked hand and frame, using a pinch
/// between thumb and index tips as the button.
#[derive(Debug, Clone)]
pub struct HandGestureMapper {
    frame: Vec2,
    threshold: f32,
    easing: Option<f32>,
}

impl HandGestureMapper {
    pub fn new(frame_width: i32, frame_height: i32, threshold: f32) -> Self {
        Self {
            frame: Vec2::new(frame_width as f32, frame_height as f32),
            threshold,
            easing: None,
        }
    }

    pub fn with_easing(mut self, factor: Option<f32>) -> Self {
        self.easing = factor;
        self
    }

    /// Mean of the wrist and the four finger bases, snapped to frame pixels.
    pub fn palm(&self, points: &[Vec2]) -> Vec2 {
        let sum: Vec2 = PALM.iter().map(|&i| points[i]).sum();
        (sum / PALM.len() as f32 * self.frame).trunc()
    }

    pub fn is_pinch(&self, points: &[Vec2]) -> bool {
        is_pinch(points[THUMB_TIP], points[INDEX_TIP], self.threshold)
    }
}

pub fn is_pinch(thumb_tip: Vec2, index_tip: Vec2, threshold: f32) -> bool {
    thumb_tip.distance(index_tip) < threshold
}

/// Decides the event from the previous and current click state.
pub fn transition(was_clicked: bool, pointer: Pointer) -> PointerEvent {
    match (was_clicked, pointer.click) {
        (false, true) => PointerEvent::Press(pointer),
        (true, false) => PointerEvent::Release(pointer),
        _ => PointerEvent::Move(pointer),
    }
}

impl InputMapper for HandGestureMapper {
    type State = HandContexts;
    type Input = [HandLandmarks];
    type Output = Vec<PointerEvent>;

    fn map(&self, state: &mut HandContexts, hands: &[HandLandmarks]) -> Vec<PointerEvent> {
        let mut events = Vec::with_capacity(hands.len());
        let mut seen = HashSet::new();

        for (index, hand) in hands.iter().enumerate() {
            let key = HandKey::of(hand, index);
            if hand.points.len() < LANDMARK_COUNT {
                debug!(?key, points = hand.points.len(), "skipping incomplete hand");
                continue;
            }
            if !seen.insert(key) {
                debug!(?key, "skipping duplicate hand");
                continue;
            }

            let mut position = self.palm(&hand.points) / self.frame;
            let click = self.is_pinch(&hand.points);
            let context = state.hands.entry(key).or_default();

            if let Some(factor) = self.easing {
                let eased = match context.cursor {
                    Some(cursor) => cursor + (position - cursor) * factor,
                    None => position,
                };
                context.cursor = Some(eased);
                position = eased;
            }

            events.push(transition(context.click, Pointer { position, click }));
            context.click = click;
            context.position = position;
        }

        // A hand lost mid-pinch lets go where it was last seen.
        state.hands.retain(|key, context| {
            let tracked = seen.contains(key);
            if !tracked && context.click {
                debug!(?key, "releasing lost hand");
                events.push(PointerEvent::Release(Pointer {
                    position: context.position,
                    click: false,
                }));
            }
            tracked
        });
        events
    }
}
