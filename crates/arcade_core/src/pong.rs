//! Two-player vertical pong.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use rand::Rng;
use tracing::info;

use arcade_api::Rect;

use crate::config::PongConfig;
use crate::error::ConfigError;
use crate::geometry::overlaps;
use crate::input::PaddleControl;
use crate::render::{Color, RenderCommand, Surface};

const SCORE_FONT_SIZE: f32 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
    pub velocity: i32,
    /// -1 left, 0 still, 1 right.
    pub direction: i32,
    pub color: Color,
}

impl Paddle {
    pub fn new(rect: Rect, velocity: i32, color: Color) -> Self {
        Self {
            rect,
            velocity,
            direction: 0,
            color,
        }
    }

    pub fn set_direction(&mut self, direction: i32) {
        self.direction = direction.signum();
    }

    pub fn stop(&mut self) {
        self.direction = 0;
    }

    /// Absolute positioning, used by face control.
    pub fn place(&mut self, x: i32) {
        self.rect.x = x;
    }

    pub fn hit_wall(&self, screen_width: i32) -> bool {
        self.rect.x <= 0 || self.rect.right() >= screen_width
    }

    pub fn step(&mut self, screen_width: i32) {
        self.rect.x += self.velocity * self.direction;
        if self.hit_wall(screen_width) {
            self.rect.x = self.rect.x.clamp(0, screen_width - self.rect.w);
        }
    }

    pub fn reset(&mut self, screen_width: i32) {
        self.rect.x = screen_width / 2 - self.rect.w / 2;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub rect: Rect,
    pub speed: i32,
    /// Each component is -1 or 1.
    pub direction: IVec2,
    pub color: Color,
}

impl Ball {
    pub fn new(rect: Rect, speed: i32, color: Color) -> Self {
        Self {
            rect,
            speed,
            direction: IVec2::ONE,
            color,
        }
    }

    pub fn hit_wall(&self, screen_width: i32) -> bool {
        self.rect.x <= 0 || self.rect.right() >= screen_width
    }

    pub fn hit_paddle(&self, paddle: &Paddle) -> bool {
        overlaps(&self.rect, &paddle.rect)
    }

    pub fn hit_top(&self) -> bool {
        self.rect.y <= 0
    }

    pub fn hit_bottom(&self, screen_height: i32) -> bool {
        self.rect.bottom() >= screen_height
    }

    pub fn bounce_horizontal(&mut self) {
        self.direction.x = -self.direction.x;
    }

    pub fn bounce_vertical(&mut self) {
        self.direction.y = -self.direction.y;
    }

    pub fn step(&mut self, screen_width: i32) {
        self.rect.x += self.speed * self.direction.x;
        self.rect.y += self.speed * self.direction.y;
        if self.hit_wall(screen_width) {
            self.bounce_horizontal();
        }
    }

    /// Recentres the ball and sends it towards `toward` with a random
    /// horizontal direction.
    pub fn serve<R: Rng + ?Sized>(&mut self, toward: ScoreSide, screen: IVec2, rng: &mut R) {
        self.rect.x = screen.x / 2 - self.rect.w / 2;
        self.rect.y = screen.y / 2 - self.rect.h / 2;
        self.direction.x = if rng.gen_bool(0.5) { 1 } else { -1 };
        self.direction.y = match toward {
            ScoreSide::Top => -1,
            ScoreSide::Bottom => 1,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreSide {
    Top,
    Bottom,
}

impl FromStr for ScoreSide {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(ScoreSide::Top),
            "bottom" => Ok(ScoreSide::Bottom),
            other => Err(ConfigError::UnknownScorePosition(other.to_string())),
        }
    }
}

impl fmt::Display for ScoreSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSide::Top => f.write_str("top"),
            ScoreSide::Bottom => f.write_str("bottom"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub side: ScoreSide,
    pub value: u32,
    pub color: Color,
}

impl Score {
    pub fn new(side: ScoreSide, color: Color) -> Self {
        Self {
            side,
            value: 0,
            color,
        }
    }

    pub fn increment(&mut self) {
        self.value += 1;
    }

    pub fn panel_position(&self, screen_height: i32) -> IVec2 {
        match self.side {
            ScoreSide::Top => IVec2::new(50, screen_height / 4),
            ScoreSide::Bottom => IVec2::new(50, screen_height / 4 * 3),
        }
    }
}

/// Paddle steering for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PongInput {
    /// Keep the current directions.
    #[default]
    Idle,
    /// Absolute paddle positions as fractions of the court width.
    Place(PaddleControl),
    /// Keyboard directions for the top and bottom paddles.
    Steer { top: i32, bottom: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pong {
    pub screen: IVec2,
    pub top: Paddle,
    pub bottom: Paddle,
    pub ball: Ball,
    pub top_score: Score,
    pub bottom_score: Score,
}

impl Pong {
    pub fn new(config: &PongConfig) -> Self {
        let screen = IVec2::new(config.screen_width, config.screen_height);
        let paddle_x = screen.x / 2 - config.paddle_width / 2;
        let paddle = |y| {
            Paddle::new(
                Rect::new(paddle_x, y, config.paddle_width, config.paddle_height),
                config.paddle_velocity,
                config.paddle_color,
            )
        };
        let ball = Rect::new(
            screen.x / 2 - config.ball_size / 2,
            screen.y / 2 - config.ball_size / 2,
            config.ball_size,
            config.ball_size,
        );

        Self {
            screen,
            top: paddle(0),
            bottom: paddle(screen.y - config.paddle_height),
            ball: Ball::new(ball, config.ball_speed, config.ball_color),
            top_score: Score::new(ScoreSide::Top, config.score_color),
            bottom_score: Score::new(ScoreSide::Bottom, config.score_color),
        }
    }

    /// New game: scores back to zero and everything recentred.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.top_score.value = 0;
        self.bottom_score.value = 0;
        self.ball.serve(ScoreSide::Bottom, self.screen, rng);
        self.top.reset(self.screen.x);
        self.bottom.reset(self.screen.x);
        self.top.stop();
        self.bottom.stop();
    }

    pub fn control(&mut self, input: &PongInput) {
        match *input {
            PongInput::Idle => {}
            PongInput::Place(control) => {
                self.top.place((self.screen.x as f32 * control.top) as i32);
                self.bottom.place((self.screen.x as f32 * control.bottom) as i32);
            }
            PongInput::Steer { top, bottom } => {
                self.top.set_direction(top);
                self.bottom.set_direction(bottom);
            }
        }
    }

    /// Advances the court by one tick and returns the side that scored.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ScoreSide> {
        self.ball.step(self.screen.x);
        self.top.step(self.screen.x);
        self.bottom.step(self.screen.x);

        if self.ball.hit_paddle(&self.top) {
            self.ball.bounce_vertical();
        }
        if self.ball.hit_paddle(&self.bottom) {
            self.ball.bounce_vertical();
        }

        let scorer = if self.ball.hit_bottom(self.screen.y) {
            ScoreSide::Top
        } else if self.ball.hit_top() {
            ScoreSide::Bottom
        } else {
            return None;
        };

        match scorer {
            ScoreSide::Top => self.top_score.increment(),
            ScoreSide::Bottom => self.bottom_score.increment(),
        }
        self.ball.serve(scorer, self.screen, rng);
        self.top.reset(self.screen.x);
        self.bottom.reset(self.screen.x);
        info!(
            %scorer,
            top = self.top_score.value,
            bottom = self.bottom_score.value,
            "point scored"
        );
        Some(scorer)
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::Clear {
            surface: Surface::Game,
            color: Color::BLACK,
        }];
        for paddle in [&self.top, &self.bottom] {
            commands.push(RenderCommand::Rect {
                surface: Surface::Game,
                rect: paddle.rect,
                color: paddle.color,
                filled: true,
            });
        }
        commands.push(RenderCommand::Rect {
            surface: Surface::Game,
            rect: self.ball.rect,
            color: self.ball.color,
            filled: true,
        });
        for score in [&self.top_score, &self.bottom_score] {
            commands.push(RenderCommand::Text {
                surface: Surface::Game,
                position: score.panel_position(self.screen.y),
                text: score.value.to_string(),
                color: score.color,
                size: SCORE_FONT_SIZE,
            });
        }
        commands
    }

    pub fn tick<R: Rng + ?Sized>(
        mut self,
        input: &PongInput,
        rng: &mut R,
    ) -> (Self, Vec<RenderCommand>) {
        self.control(input);
        self.update(rng);
        let commands = self.render();
        (self, commands)
    }
}
