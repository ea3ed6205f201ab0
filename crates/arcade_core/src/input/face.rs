use arcade_api::{FaceDetection, Rect};

use crate::geometry::{largest_by_area, normalize, rect_contains};
use crate::input::InputMapper;

/// Desired paddle positions as fractions of the court width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleControl {
    pub top: f32,
    pub bottom: f32,
}

impl Default for PaddleControl {
    fn default() -> Self {
        Self {
            top: 0.5,
            bottom: 0.5,
        }
    }
}

/// The face chosen for each player in a frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Players<'a> {
    pub left: Option<&'a FaceDetection>,
    pub right: Option<&'a FaceDetection>,
}

/// Steers the top paddle with the largest face in the left region and the
/// bottom paddle with the largest face in the right region.
#[derive(Debug, Clone)]
pub struct FacePaddleMapper {
    left: Rect,
    right: Rect,
}

impl FacePaddleMapper {
    /// Splits a camera frame into a left and a right half.
    pub fn new(frame_width: i32, frame_height: i32) -> Self {
        let half = frame_width / 2;
        Self::with_regions(
            Rect::new(0, 0, half, frame_height),
            Rect::new(half, 0, half, frame_height),
        )
    }

    pub fn with_regions(left: Rect, right: Rect) -> Self {
        Self { left, right }
    }

    pub fn left_region(&self) -> Rect {
        self.left
    }

    pub fn right_region(&self) -> Rect {
        self.right
    }

    pub fn players<'a>(&self, faces: &'a [FaceDetection]) -> Players<'a> {
        let inside = |region: Rect| {
            move |face: &FaceDetection| rect_contains(&face.facial_area, &region)
        };
        Players {
            left: largest_by_area(faces, inside(self.left)),
            right: largest_by_area(faces, inside(self.right)),
        }
    }

    fn fraction(face: &FaceDetection, region: &Rect) -> f32 {
        let area = face.facial_area;
        let center = area.x - region.x + area.w / 2;
        normalize(center as f32, region.w as f32)
    }
}

impl InputMapper for FacePaddleMapper {
    type State = PaddleControl;
    type Input = [FaceDetection];
    type Output = PaddleControl;

    fn map(&self, state: &mut PaddleControl, faces: &[FaceDetection]) -> PaddleControl {
        let players = self.players(faces);
        if let Some(face) = players.left {
            state.top = Self::fraction(face, &self.left);
        }
        if let Some(face) = players.right {
            state.bottom = Self::fraction(face, &self.right);
        }
        *state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: i32, y: i32, w: i32, h: i32) -> FaceDetection {
        FaceDetection {
            facial_area: Rect::new(x, y, w, h),
            confidence: 0.9,
            dominant_emotion: None,
        }
    }

    #[test]
    fn halves_of_the_frame() {
        let mapper = FacePaddleMapper::new(1280, 720);
        assert_eq!(mapper.left_region(), Rect::new(0, 0, 640, 720));
        assert_eq!(mapper.right_region(), Rect::new(640, 0, 640, 720));
    }

    #[test]
    fn maps_face_centres_within_their_half() {
        let mapper = FacePaddleMapper::new(1280, 720);
        let mut state = PaddleControl::default();
        let faces = vec![face(100, 100, 120, 120), face(900, 200, 100, 100)];
        let control = mapper.map(&mut state, &faces);
        assert_eq!(control.top, 160.0 / 640.0);
        assert_eq!(control.bottom, 310.0 / 640.0);
        assert_eq!(state, control);
    }

    #[test]
    fn largest_face_wins_and_straddlers_are_ignored() {
        let mapper = FacePaddleMapper::new(1280, 720);
        let mut state = PaddleControl::default();
        let faces = vec![
            face(0, 0, 50, 50),
            face(600, 0, 200, 200),
            face(320, 0, 64, 64),
        ];
        let control = mapper.map(&mut state, &faces);
        assert_eq!(control.top, (320.0 + 32.0) / 640.0);
        assert_eq!(control.bottom, 0.5);
    }

    #[test]
    fn missing_faces_keep_the_previous_value() {
        let mapper = FacePaddleMapper::new(1280, 720);
        let mut state = PaddleControl::default();
        mapper.map(&mut state, &[face(0, 0, 64, 64)]);
        let control = mapper.map(&mut state, &[]);
        assert_eq!(control.top, 32.0 / 640.0);
        assert_eq!(control.bottom, 0.5);
    }
}
