use glam::IVec2;

use arcade_api::{FaceDetection, Rect};

/// Anything with a pixel bounding box.
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Bounded for FaceDetection {
    fn bounds(&self) -> Rect {
        self.facial_area
    }
}

/// True when `inner` lies within `outer`, edges inclusive.
pub fn rect_contains(inner: &Rect, outer: &Rect) -> bool {
    inner.x >= outer.x
        && inner.right() <= outer.right()
        && inner.y >= outer.y
        && inner.bottom() <= outer.bottom()
}

/// AABB overlap. Rectangles that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// Point test with the left/top edges inside and the right/bottom edges
/// outside.
pub fn contains_point(rect: &Rect, point: IVec2) -> bool {
    point.x >= rect.x && point.x < rect.right() && point.y >= rect.y && point.y < rect.bottom()
}

/// The candidate with the largest area among those accepted by `predicate`.
/// Ties keep the first one encountered. Empty boxes never win.
pub fn largest_by_area<'a, T, I, P>(candidates: I, predicate: P) -> Option<&'a T>
where
    T: Bounded + 'a,
    I: IntoIterator<Item = &'a T>,
    P: Fn(&T) -> bool,
{
    let mut largest: Option<(&'a T, i64)> = None;
    for candidate in candidates {
        if !predicate(candidate) {
            continue;
        }
        let area = candidate.bounds().area();
        let best = largest.map_or(0, |(_, best)| best);
        if area > best {
            largest = Some((candidate, area));
        }
    }
    largest.map(|(candidate, _)| candidate)
}

/// Maps `value` in `[0, range]` onto `[0, 1]`.
pub fn normalize(value: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return 0.0;
    }
    (value / range).clamp(0.0, 1.0)
}
