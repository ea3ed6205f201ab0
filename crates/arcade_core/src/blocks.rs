//! Pointer driven block playground: press on empty space to drop a block,
//! press on a block to pick it up, move to drag it, release to let go.

use glam::IVec2;
use rand::Rng;
use tracing::debug;

use arcade_api::Rect;

use crate::config::PlaygroundConfig;
use crate::geometry::contains_point;
use crate::input::PointerEvent;
use crate::render::{Color, RenderCommand, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub rect: Rect,
    pub color: Color,
}

impl Block {
    pub fn move_to(&mut self, origin: IVec2) {
        self.rect.x = origin.x;
        self.rect.y = origin.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    block: BlockId,
    /// Block origin minus the cursor at the time of the grab.
    offset: IVec2,
}

#[derive(Debug, Clone, Default)]
pub struct Blocks {
    blocks: Vec<Block>,
    drag: Option<Drag>,
    next_id: u64,
}

impl Blocks {
    pub fn add(&mut self, rect: Rect, color: Color) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.push(Block { id, rect, color });
        id
    }

    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        if self.dragging() == Some(id) {
            self.drag = None;
        }
        Some(self.blocks.remove(index))
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The oldest block under `cursor`.
    pub fn collide(&self, cursor: IVec2) -> Option<BlockId> {
        self.blocks
            .iter()
            .find(|b| contains_point(&b.rect, cursor))
            .map(|b| b.id)
    }

    pub fn dragging(&self) -> Option<BlockId> {
        self.drag.map(|d| d.block)
    }

    pub fn start_drag(&mut self, id: BlockId, cursor: IVec2) {
        let Some(block) = self.get(id) else {
            return;
        };
        let offset = IVec2::new(block.rect.x, block.rect.y) - cursor;
        self.drag = Some(Drag { block: id, offset });
    }

    pub fn stop_drag(&mut self) {
        self.drag = None;
    }

    pub fn drag(&mut self, cursor: IVec2) {
        let Some(drag) = self.drag else {
            return;
        };
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == drag.block) {
            block.move_to(cursor + drag.offset);
        }
    }
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::rgb(rng.gen(), rng.gen(), rng.gen())
}

#[derive(Debug, Clone)]
pub struct Playground {
    pub size: IVec2,
    pub blocks: Blocks,
    pub cursor: IVec2,
    cursor_size: i32,
    cursor_color: Color,
}

impl Playground {
    pub fn new(config: &PlaygroundConfig) -> Self {
        Self {
            size: IVec2::new(config.width, config.height),
            blocks: Blocks::default(),
            cursor: IVec2::ZERO,
            cursor_size: config.cursor_size,
            cursor_color: config.cursor_color,
        }
    }

    pub fn press<R: Rng + ?Sized>(&mut self, at: IVec2, rng: &mut R) {
        if let Some(id) = self.blocks.collide(at) {
            debug!(?id, x = at.x, y = at.y, "grabbed block");
            self.blocks.start_drag(id, at);
        } else {
            let rect = Rect::new(at.x, at.y, rng.gen_range(10..=100), rng.gen_range(10..=100));
            let id = self.blocks.add(rect, random_color(rng));
            debug!(?id, ?rect, "added block");
        }
    }

    /// Moves the cursor. Only a clicking pointer carries the held block.
    pub fn motion(&mut self, at: IVec2, click: bool) {
        self.cursor = at;
        if click {
            self.blocks.drag(at);
        }
    }

    pub fn release(&mut self) {
        self.blocks.stop_drag();
    }

    /// Converts a normalized pointer position into playground pixels.
    pub fn to_screen(&self, event: &PointerEvent) -> IVec2 {
        let position = event.pointer().position * self.size.as_vec2();
        position.as_ivec2()
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, event: &PointerEvent, rng: &mut R) {
        let at = self.to_screen(event);
        match event {
            PointerEvent::Press(_) => self.press(at, rng),
            PointerEvent::Release(_) => self.release(),
            PointerEvent::Move(pointer) => self.motion(at, pointer.click),
        }
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::Clear {
            surface: Surface::Game,
            color: Color::BLACK,
        }];
        commands.extend(self.blocks.iter().map(|block| RenderCommand::Rect {
            surface: Surface::Game,
            rect: block.rect,
            color: block.color,
            filled: true,
        }));
        commands.push(RenderCommand::Rect {
            surface: Surface::Game,
            rect: Rect::new(self.cursor.x, self.cursor.y, self.cursor_size, self.cursor_size),
            color: self.cursor_color,
            filled: true,
        });
        commands
    }

    pub fn tick<R: Rng + ?Sized>(
        mut self,
        events: &[PointerEvent],
        rng: &mut R,
    ) -> (Self, Vec<RenderCommand>) {
        for event in events {
            self.apply(event, rng);
        }
        let commands = self.render();
        (self, commands)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::input::Pointer;

    use super::*;

    fn playground() -> Playground {
        Playground::new(&PlaygroundConfig::default())
    }

    #[test]
    fn press_on_empty_space_adds_a_block() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut playground = playground();
        playground.press(IVec2::new(50, 50), &mut rng);

        let block = playground.blocks.iter().next().unwrap();
        assert_eq!((block.rect.x, block.rect.y), (50, 50));
        assert!((10..=100).contains(&block.rect.w));
        assert!((10..=100).contains(&block.rect.h));
        assert_eq!(playground.blocks.dragging(), None);
    }

    #[test]
    fn drag_keeps_the_grab_point() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut playground = playground();
        playground.press(IVec2::new(50, 50), &mut rng);
        let id = playground.blocks.collide(IVec2::new(55, 55)).unwrap();

        playground.press(IVec2::new(55, 55), &mut rng);
        assert_eq!(playground.blocks.dragging(), Some(id));
        assert_eq!(playground.blocks.len(), 1);

        playground.motion(IVec2::new(80, 80), true);
        playground.release();

        let block = playground.blocks.get(id).unwrap();
        assert_eq!((block.rect.x, block.rect.y), (75, 75));
        assert_eq!(playground.blocks.dragging(), None);
        assert_eq!(playground.cursor, IVec2::new(80, 80));

        // Moving after release leaves the block alone.
        playground.motion(IVec2::new(300, 300), true);
        assert_eq!(playground.blocks.get(id).unwrap().rect.x, 75);
    }

    #[test]
    fn open_pointer_does_not_carry_the_held_block() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut playground = playground();
        playground.press(IVec2::new(50, 50), &mut rng);
        playground.press(IVec2::new(50, 50), &mut rng);
        let id = playground.blocks.dragging().unwrap();

        playground.apply(&PointerEvent::Move(Pointer::new(0.5, 0.5, false)), &mut rng);
        assert_eq!(playground.cursor, IVec2::new(640, 360));
        assert_eq!(playground.blocks.get(id).unwrap().rect.x, 50);

        playground.apply(&PointerEvent::Move(Pointer::new(0.5, 0.5, true)), &mut rng);
        assert_eq!(playground.blocks.get(id).unwrap().rect.x, 640);
    }

    #[test]
    fn overlapping_blocks_grab_the_oldest() {
        let mut blocks = Blocks::default();
        let first = blocks.add(Rect::new(0, 0, 50, 50), Color::RED);
        blocks.add(Rect::new(10, 10, 50, 50), Color::GREEN);
        assert_eq!(blocks.collide(IVec2::new(20, 20)), Some(first));
        assert_eq!(blocks.collide(IVec2::new(100, 100)), None);
    }

    #[test]
    fn removing_the_dragged_block_clears_the_drag() {
        let mut blocks = Blocks::default();
        let id = blocks.add(Rect::new(0, 0, 50, 50), Color::RED);
        let other = blocks.add(Rect::new(100, 0, 50, 50), Color::RED);
        blocks.start_drag(id, IVec2::new(10, 10));
        assert!(blocks.remove(other).is_some());
        assert_eq!(blocks.dragging(), Some(id));
        assert!(blocks.remove(id).is_some());
        assert_eq!(blocks.dragging(), None);
        assert!(blocks.remove(id).is_none());
        blocks.drag(IVec2::new(5, 5));
        assert_eq!(blocks.len(), 0);
    }

    #[test]
    fn pointer_events_are_scaled_to_the_playground() {
        let mut rng = StdRng::seed_from_u64(5);
        let events = [
            PointerEvent::Move(Pointer::new(0.5, 0.5, false)),
            PointerEvent::Press(Pointer::new(0.5, 0.5, true)),
            PointerEvent::Move(Pointer {
                position: Vec2::new(0.75, 0.5),
                click: true,
            }),
            PointerEvent::Release(Pointer::new(0.75, 0.5, false)),
        ];
        let (playground, commands) = playground().tick(&events, &mut rng);
        assert_eq!(playground.cursor, IVec2::new(960, 360));
        let block = playground.blocks.iter().next().unwrap();
        // Created by the press, not dragged: a new block is never grabbed.
        assert_eq!((block.rect.x, block.rect.y), (640, 360));
        assert_eq!(commands.len(), 3);
    }
}
