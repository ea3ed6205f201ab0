//! Turning tracker output into control signals.
//!
//! Mappers hold only their configuration. Whatever has to survive between
//! frames lives in the mapper's `State`, which the caller owns and passes in
//! on every tick.

pub use face::{FacePaddleMapper, PaddleControl, Players};
pub use hand::{
    is_pinch, transition, HandContext, HandContexts, HandGestureMapper, HandKey, Pointer,
    PointerEvent, LANDMARK_COUNT,
};

mod face;
mod hand;

pub trait InputMapper {
    type State: Default;
    type Input: ?Sized;
    type Output;

    fn map(&self, state: &mut Self::State, input: &Self::Input) -> Self::Output;
}
